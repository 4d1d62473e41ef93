// Thin front end over the library: loads a checkpoint and prints one
// prediction. Training demos live under demos/:
//   cargo run --example sum_train
//   cargo run -- sum-relu-checkpoint.json.gz 2 2
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((path, values)) = args.split_first() else {
        eprintln!("usage: gonn <checkpoint> <input>...");
        return ExitCode::FAILURE;
    };

    let input: Result<Vec<f64>, _> = values.iter().map(|v| v.parse::<f64>()).collect();
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            eprintln!("invalid input value: {e}");
            return ExitCode::FAILURE;
        }
    };

    let prediction = gonn::load_checkpoint(path).and_then(|mut network| network.predict(&input));
    match prediction {
        Ok(output) => {
            println!("Predicting {input:?} => {output:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("gonn: {e}");
            ExitCode::FAILURE
        }
    }
}
