use gonn::{
    load_checkpoint, ActivationFunction, CheckpointRecord, Error, Network, NetworkOption,
    OptionValue,
};
use tempfile::tempdir;

#[test]
fn save_then_load_is_exact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("checkpoint.json.gz");

    let mut network = Network::builder(3, &[6, 4, 2]).seed(123).build().unwrap();
    for _ in 0..20 {
        network.train(&[0.3, 1.7, 0.9], &[1.0, 0.5], 0.001).unwrap();
    }
    network.save(&path).unwrap();

    let mut loaded = load_checkpoint(&path).unwrap();
    assert_eq!(loaded.layers(), network.layers());
    assert_eq!(loaded.input_size(), 3);
    assert_eq!(loaded.layer_sizes(), vec![6, 4, 2]);

    let input = [0.25, -1.5, 3.0];
    assert_eq!(loaded.predict(&input).unwrap(), network.predict(&input).unwrap());
}

#[test]
fn activation_survives_the_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sigmoid.json.gz");

    let network = Network::with_activation(ActivationFunction::Sigmoid, 2, &[3, 1]).unwrap();
    network.save(&path).unwrap();

    let loaded = Network::load(&path).unwrap();
    assert_eq!(
        loaded.get_option(NetworkOption::ActivationFunction).unwrap(),
        OptionValue::Activation(ActivationFunction::Sigmoid)
    );
    assert!(matches!(
        loaded.get_option(NetworkOption::RandomizeWeights),
        Err(Error::UnknownOption(NetworkOption::RandomizeWeights))
    ));
}

#[test]
fn loaded_network_keeps_training() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resume.json.gz");

    let mut original = Network::builder(2, &[4, 1]).seed(5).build().unwrap();
    original.train(&[1.0, 2.0], &[3.0], 0.001).unwrap();
    original.save(&path).unwrap();

    let mut resumed = load_checkpoint(&path).unwrap();
    original.train(&[1.0, 2.0], &[3.0], 0.001).unwrap();
    resumed.train(&[1.0, 2.0], &[3.0], 0.001).unwrap();
    assert_eq!(resumed.layers(), original.layers());
}

#[test]
fn plain_json_export_matches_the_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("record.json");

    let network = Network::builder(2, &[2, 1]).seed(9).build().unwrap();
    let record = CheckpointRecord::encode(&network);
    record.save_json(&path).unwrap();
    assert_eq!(CheckpointRecord::load_json(&path).unwrap(), record);
}

#[test]
fn randomize_option_on_loaded_network_only_records_the_flag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("loaded.json.gz");

    let network = Network::builder(2, &[3, 1]).seed(31).build().unwrap();
    network.save(&path).unwrap();

    let mut loaded = load_checkpoint(&path).unwrap();
    loaded.set_option(NetworkOption::RandomizeWeights, Some(false.into())).unwrap();
    assert_eq!(loaded.layers(), network.layers());
    assert_eq!(
        loaded.get_option(NetworkOption::RandomizeWeights).unwrap(),
        OptionValue::Flag(false)
    );
}
