use gonn::{train_network, ActivationFunction, Network};

fn main() -> gonn::Result<()> {
    env_logger::init();

    let mut network = Network::builder(2, &[2, 1])
        .activation(ActivationFunction::Sigmoid)
        .seed(7)
        .build()?;

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    let epochs = 10000;

    for epoch in 0..epochs {
        let loss = train_network(&mut network, &inputs, &expected_outputs, 0.1)?;
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.predict(input)?[0]);
    }
    Ok(())
}
