use gonn::{Network, NetworkOption};
use std::f64::consts::{E, PI};

fn main() -> gonn::Result<()> {
    env_logger::init();
    println!("gonn sum-train demo");

    let mut network = Network::new(2, &[8, 1])?;
    network.set_option(NetworkOption::RandomizeBias, Some(false.into()))?;
    network.set_option(NetworkOption::RandomizeWeights, Some(true.into()))?;

    let inputs = vec![
        vec![2.0, 2.0],
        vec![0.0, 1.0],
        vec![14.0, 6.0],
        vec![14.0, 16.0],
        vec![PI, E],
        vec![47.0, 32.0],
    ];
    let outputs = vec![
        vec![4.0],
        vec![1.0],
        vec![20.0],
        vec![30.0],
        vec![PI + E],
        vec![79.0],
    ];

    let epochs = 100_000;
    println!("Training for {epochs} epochs...");
    network.train_batch(&inputs, &outputs, epochs, 0.0001)?;
    println!("Done");

    network.save("sum-relu-checkpoint.json.gz")
}
