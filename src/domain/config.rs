use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a corpus build.
///
/// This struct holds the bounds that keep the graph analytics tractable on
/// large corpora, and the file extensions treated as documents when a
/// directory is scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Number of entries reported in each ranking (most cited, most citing,
    /// most central).
    top_k: usize,

    /// Maximum number of edges in an enumerated citation chain.
    chain_max_depth: usize,

    /// Minimum number of articles in a citation chain for it to be reported.
    chain_min_nodes: usize,

    /// Whether long citation chains are enumerated at all.
    ///
    /// Chain enumeration is exponential in dense graphs, so it can be switched
    /// off for large corpora.
    pub chains_enabled: bool,

    /// Maximum number of partial paths explored from each starting article
    /// while enumerating chains.
    ///
    /// Once reached, the search from that article stops and the chains found
    /// so far are kept.
    max_chain_paths: usize,

    /// Largest graph (in nodes) for which betweenness centrality is computed.
    max_centrality_nodes: usize,

    /// Maximum number of simple cycles enumerated before giving up.
    max_cycles: usize,

    /// File extensions (without the dot) recognised as documents.
    document_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            chain_max_depth: default_chain_max_depth(),
            chain_min_nodes: default_chain_min_nodes(),
            chains_enabled: true,
            max_chain_paths: default_max_chain_paths(),
            max_centrality_nodes: default_max_centrality_nodes(),
            max_cycles: default_max_cycles(),
            document_extensions: default_document_extensions(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Number of entries in each ranking.
    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Maximum chain length, in edges.
    #[must_use]
    pub const fn chain_max_depth(&self) -> usize {
        self.chain_max_depth
    }

    /// Minimum chain length, in articles, for a chain to be reported.
    #[must_use]
    pub const fn chain_min_nodes(&self) -> usize {
        self.chain_min_nodes
    }

    /// Budget of explored paths per starting article for chain enumeration.
    #[must_use]
    pub const fn max_chain_paths(&self) -> usize {
        self.max_chain_paths
    }

    /// Largest graph for which centrality is computed.
    #[must_use]
    pub const fn max_centrality_nodes(&self) -> usize {
        self.max_centrality_nodes
    }

    /// Maximum number of cycles enumerated.
    #[must_use]
    pub const fn max_cycles(&self) -> usize {
        self.max_cycles
    }

    /// Extensions recognised as documents.
    #[must_use]
    pub fn document_extensions(&self) -> &[String] {
        &self.document_extensions
    }

    /// Checks whether a file extension is recognised as a document.
    ///
    /// The comparison is case-insensitive.
    #[must_use]
    pub fn is_document_extension(&self, extension: &str) -> bool {
        self.document_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Sets the number of entries in each ranking.
    pub const fn set_top_k(&mut self, top_k: usize) {
        self.top_k = top_k;
    }

    /// Sets the chain depth bound, in edges.
    pub const fn set_chain_max_depth(&mut self, depth: usize) {
        self.chain_max_depth = depth;
    }

    /// Sets the path budget for chain enumeration.
    pub const fn set_max_chain_paths(&mut self, paths: usize) {
        self.max_chain_paths = paths;
    }

    /// Sets the node bound for centrality.
    pub const fn set_max_centrality_nodes(&mut self, nodes: usize) {
        self.max_centrality_nodes = nodes;
    }

    /// Sets the cycle enumeration bound.
    pub const fn set_max_cycles(&mut self, cycles: usize) {
        self.max_cycles = cycles;
    }
}

const fn default_top_k() -> usize {
    10
}

const fn default_chain_max_depth() -> usize {
    10
}

const fn default_chain_min_nodes() -> usize {
    4
}

const fn default_max_chain_paths() -> usize {
    1_000_000
}

const fn default_max_centrality_nodes() -> usize {
    20_000
}

const fn default_max_cycles() -> usize {
    10_000
}

const fn default_true() -> bool {
    true
}

fn default_document_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_top_k")]
        top_k: usize,

        /// Maximum number of edges in an enumerated chain.
        #[serde(default = "default_chain_max_depth")]
        chain_max_depth: usize,

        #[serde(default = "default_chain_min_nodes")]
        chain_min_nodes: usize,

        #[serde(default = "default_true")]
        chains_enabled: bool,

        #[serde(default = "default_max_chain_paths")]
        max_chain_paths: usize,

        #[serde(default = "default_max_centrality_nodes")]
        max_centrality_nodes: usize,

        #[serde(default = "default_max_cycles")]
        max_cycles: usize,

        #[serde(default = "default_document_extensions")]
        document_extensions: Vec<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                top_k,
                chain_max_depth,
                chain_min_nodes,
                chains_enabled,
                max_chain_paths,
                max_centrality_nodes,
                max_cycles,
                document_extensions,
            } => Self {
                top_k,
                chain_max_depth,
                chain_min_nodes,
                chains_enabled,
                max_chain_paths,
                max_centrality_nodes,
                max_cycles,
                document_extensions,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            top_k: config.top_k,
            chain_max_depth: config.chain_max_depth,
            chain_min_nodes: config.chain_min_nodes,
            chains_enabled: config.chains_enabled,
            max_chain_paths: config.max_chain_paths,
            max_centrality_nodes: config.max_centrality_nodes,
            max_cycles: config.max_cycles,
            document_extensions: config.document_extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ntop_k = 5\nchain_max_depth = 6\nchains_enabled = false\ndocument_extensions = [\"txt\", \"text\"]\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.top_k(), 5);
        assert_eq!(config.chain_max_depth(), 6);
        assert!(!config.chains_enabled);
        assert_eq!(
            config.document_extensions(),
            &["txt".to_string(), "text".to_string()]
        );
        assert_eq!(config.max_cycles(), default_max_cycles());
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ntop_k = \"ten\"\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("rulebook.toml");

        let mut config = Config::default();
        config.set_top_k(3);
        config.chains_enabled = false;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn extension_matching_ignores_case() {
        let config = Config::default();
        assert!(config.is_document_extension("TXT"));
        assert!(!config.is_document_extension("pdf"));
    }
}
