use serde::Deserialize;
use std::{path::Path, time::Instant};

use super::{error::Error, road_network::RoadNetwork};

/// One row of an edge list file with header `from,to,length`
#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: String,
    to: String,
    length: f64,
}

/// Read a road network from a CSV edge list
pub fn load_edge_list<P: AsRef<Path>>(path: P) -> Result<RoadNetwork, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    let mut network = RoadNetwork::new();
    for record in reader.deserialize() {
        let record: EdgeRecord = record?;
        network.add_edge(&record.from, &record.to, record.length)?;
    }
    Ok(network)
}

/// Load a network snapshot written by `save_cache`
pub fn load_cached<P: AsRef<Path>>(path: P) -> Result<RoadNetwork, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::CacheNotFound);
    }
    let network = bincode::deserialize_from(std::io::BufReader::new(std::fs::File::open(path)?))?;
    Ok(network)
}

pub fn save_cache<P: AsRef<Path>>(network: &RoadNetwork, path: P) -> Result<(), Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    bincode::serialize_into(std::io::BufWriter::new(std::fs::File::create(path)?), network)?;
    Ok(())
}

/// Load a network from the cache if present, otherwise from the edge list
///
/// # Parameters
/// - `edge_list`: CSV file with `from,to,length` rows
/// - `cache`: optional snapshot file, written after a fresh load
pub fn load<P: AsRef<Path>>(edge_list: P, cache: Option<&Path>) -> Result<RoadNetwork, Error> {
    let start = Instant::now();
    if let Some(cache) = cache {
        match load_cached(cache) {
            Ok(network) => {
                log::debug!(
                    "Cached network {} loaded in {}ms",
                    cache.display(),
                    start.elapsed().as_millis()
                );
                return Ok(network);
            }
            Err(Error::CacheNotFound) => {
                log::debug!("Cache not found at {}", cache.display());
            }
            Err(e) => {
                log::warn!("Ignoring unreadable cache {}: {}", cache.display(), e);
            }
        }
    }

    let network = load_edge_list(edge_list.as_ref())?;
    log::debug!(
        "Edge list {} loaded in {}ms",
        edge_list.as_ref().display(),
        start.elapsed().as_millis()
    );

    if let Some(cache) = cache {
        let cache_start = Instant::now();
        save_cache(&network, cache)?;
        log::debug!("Network cached in {}ms", cache_start.elapsed().as_millis());
    }
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_edges(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("edges.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_edge_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_edges(dir.path(), "from,to,length\nS, A, 1.5\nA,E,2\n");
        let network = load_edge_list(&path).unwrap();
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 2);
        assert_eq!(network.weight("S", "A").unwrap(), 1.5);
    }

    #[test]
    fn rejects_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_edges(dir.path(), "from,to,length\nS,A,not-a-number\n");
        assert!(matches!(load_edge_list(&path), Err(Error::Csv(_))));
    }

    #[test]
    fn cache_is_written_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_edges(dir.path(), "from,to,length\nS,A,1\nA,E,2\n");
        let cache = dir.path().join("cache").join("net.cached");
        assert!(matches!(load_cached(&cache), Err(Error::CacheNotFound)));

        let fresh = load(&path, Some(cache.as_path())).unwrap();
        assert!(cache.exists());

        // the cache wins even once the edge list is gone
        std::fs::remove_file(&path).unwrap();
        let cached = load(&path, Some(cache.as_path())).unwrap();
        assert_eq!(cached.edge_count(), fresh.edge_count());
        assert_eq!(cached.weight("A", "E").unwrap(), 2.0);
    }
}
