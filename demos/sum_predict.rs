use std::f64::consts::{E, PI};

fn main() -> gonn::Result<()> {
    env_logger::init();
    println!("gonn sum-predict demo");

    let mut network = gonn::load_checkpoint("sum-relu-checkpoint.json.gz")?;

    let inputs = [
        [2.0, 2.0],
        [0.0, 1.0],
        [14.0, 6.0],
        [14.0, 16.0],
        [7.0, 7.0],
        [1.0, 1.0],
        [44.0, 12.0],
        [1.5, 2.5],
        [6.5, 5.5],
        [PI, E],
        [3210.0, 2238.0],
    ];

    for input in &inputs {
        let p = network.predict(input)?[0].round() as i64;
        println!("Predicting {input:?} => {p}");
    }
    Ok(())
}
