use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{info, warn};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;

use crate::checkpoint::record::CheckpointRecord;
use crate::error::{Error, Result};
use crate::network::Network;

/// Writes `network` to `path` as gzip-compressed JSON at the highest
/// compression level. Any existing file is removed first; a failed write
/// removes the partial file. A network holding NaN or infinity is rejected
/// before anything on disk is touched.
pub fn save<P: AsRef<Path>>(network: &Network, path: P) -> Result<()> {
    let path = path.as_ref();
    let record = CheckpointRecord::encode(network);
    record.ensure_finite()?;

    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let file = File::create(path)?;
    if let Err(e) = write_compressed(file, &record) {
        warn!("removing partial checkpoint {}: {e}", path.display());
        let _ = fs::remove_file(path);
        return Err(e);
    }

    info!("saved checkpoint {} ({} layers)", path.display(), record.layers.len());
    Ok(())
}

fn write_compressed(file: File, record: &CheckpointRecord) -> Result<()> {
    let mut encoder = GzEncoder::new(file, Compression::best());
    serde_json::to_writer(&mut encoder, record).map_err(|e| {
        if e.is_io() { Error::Io(e.into()) } else { Error::Serialization(e) }
    })?;
    let mut file = encoder.finish()?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

/// Reads a checkpoint written by [`save`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let record: CheckpointRecord = serde_json::from_reader(decoder)?;
    let network = record.decode()?;
    info!(
        "loaded checkpoint {} ({:?} on {} inputs)",
        path.display(),
        network.layer_sizes(),
        network.input_size()
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HiddenDelta;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn saved_file_is_gzip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("net.json.gz");
        let network = Network::builder(2, &[2, 1]).seed(3).build().unwrap();
        save(&network, &path).unwrap();

        let mut bytes = Vec::new();
        File::open(&path).unwrap().read_to_end(&mut bytes).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

        let mut json = String::new();
        GzDecoder::new(&bytes[..]).read_to_string(&mut json).unwrap();
        assert!(json.contains("\"activation_function\":\"relu\""));
    }

    #[test]
    fn save_replaces_an_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("net.json.gz");
        fs::write(&path, vec![0u8; 64 * 1024]).unwrap();

        let network = Network::builder(1, &[1]).seed(8).build().unwrap();
        save(&network, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.layers(), network.layers());
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("net.json.gz");
        let network = Network::new(1, &[1]).unwrap();
        assert!(matches!(save(&network, &path), Err(Error::Io(_))));
    }

    #[test]
    fn hidden_delta_rule_is_not_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chained.json.gz");
        let network = Network::builder(2, &[2, 1])
            .hidden_delta(HiddenDelta::Chained)
            .seed(4)
            .build()
            .unwrap();
        save(&network, &path).unwrap();
        assert_eq!(load(&path).unwrap().config().hidden_delta, HiddenDelta::Shared);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(load(dir.path().join("nope.gz")), Err(Error::Io(_))));
    }

    #[test]
    fn garbage_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.gz");
        fs::write(&path, b"definitely not gzip").unwrap();
        assert!(matches!(load(&path), Err(Error::Serialization(_))));
    }

    fn diverged() -> Network {
        let mut network = Network::builder(2, &[8, 1]).seed(1).build().unwrap();
        for _ in 0..1000 {
            network.train(&[14.0, 16.0], &[30.0], 0.5).unwrap();
            let finite = network.layers().iter().flat_map(|l| &l.neurons).all(|n| {
                n.bias.weight.is_finite() && n.synapses.iter().all(|s| s.weight.is_finite())
            });
            if !finite {
                return network;
            }
        }
        panic!("network never diverged");
    }

    #[test]
    fn diverged_network_is_rejected_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diverged.json.gz");
        let err = save(&diverged(), &path).unwrap_err();
        assert!(matches!(err, Error::NonFiniteParameter(_)));
        assert!(!path.exists());
    }

    #[test]
    fn diverged_network_leaves_previous_checkpoint_loadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("net.json.gz");
        let good = Network::builder(2, &[8, 1]).seed(1).build().unwrap();
        save(&good, &path).unwrap();

        assert!(save(&diverged(), &path).is_err());
        assert_eq!(load(&path).unwrap().layers(), good.layers());
    }

    #[test]
    fn truncated_stream_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("net.json.gz");
        let network = Network::builder(3, &[8, 4, 1]).seed(2).build().unwrap();
        save(&network, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(load(&path), Err(Error::Serialization(_))));
    }
}
