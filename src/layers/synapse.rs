/// A single weighted connection. Remembers the last non-zero input it saw so
/// that `adjust` can scale the update by it.
#[derive(Debug, Clone, PartialEq)]
pub struct Synapse {
    pub weight: f64,
    pub last_in: f64,
    pub last_out: f64,
}

impl Synapse {
    pub fn new(weight: f64) -> Synapse {
        Synapse { weight, last_in: 0.0, last_out: 0.0 }
    }

    /// Zero input short-circuits to `0.0` and leaves both caches untouched.
    pub fn fire(&mut self, x: f64) -> f64 {
        if x == 0.0 {
            return 0.0;
        }
        self.last_in = x;
        self.last_out = x * self.weight;
        self.last_out
    }

    /// `weight += delta * last_in`, using the cached input from the most
    /// recent non-zero `fire`.
    pub fn adjust(&mut self, delta: f64) {
        self.weight += delta * self.last_in;
    }
}
