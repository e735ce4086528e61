//! Shared test vector fixtures for the accountable-assertions workspace.
//!
//! The files are embedded at compile time so consumers can rely on the
//! fixtures without performing any I/O at runtime or maintaining their own
//! copies. The chameleon hash vector for the `"abc"` message is the
//! original fixed vector of the scheme; the remaining values were computed
//! independently from the scheme algebra and are regression-pinned here.

/// Chameleon hash fixtures: fixed hash outputs and a trapdoor collision.
pub mod chameleon {
    /// Metadata describing an embedded chameleon hash vector file.
    #[derive(Clone, Copy, Debug)]
    pub struct TestVector {
        /// File name of the vector.
        pub name: &'static str,
        /// Raw file contents as JSON.
        pub contents: &'static str,
    }

    /// All embedded chameleon hash test vectors.
    pub const ALL: &[TestVector] = &[TestVector {
        name: "chameleon_hash_test_vectors.json",
        contents: include_str!("../test_vectors/chameleon_hash_test_vectors.json"),
    }];

    /// Fetch an embedded vector file by name.
    #[must_use]
    pub fn get(name: &str) -> Option<&'static str> {
        ALL.iter()
            .find(|vector| vector.name == name)
            .map(|vector| vector.contents)
    }

    /// Convenience helper that returns the list of vector names.
    #[must_use = "Iterate to consume the chameleon vector names"]
    pub fn names() -> impl Iterator<Item = &'static str> {
        ALL.iter().map(|vector| vector.name)
    }
}

/// Authenticator fixtures: fixed key material, derived public parameters and
/// two verifying tokens whose combination extracts the secret key.
pub mod authenticator {
    /// Metadata describing an embedded authenticator vector file.
    #[derive(Clone, Copy, Debug)]
    pub struct TestVector {
        /// File name of the vector.
        pub name: &'static str,
        /// Raw file contents as JSON.
        pub contents: &'static str,
    }

    /// All embedded authenticator test vectors.
    pub const ALL: &[TestVector] = &[TestVector {
        name: "authenticator_test_vectors.json",
        contents: include_str!("../test_vectors/authenticator_test_vectors.json"),
    }];

    /// Fetch an embedded vector file by name.
    #[must_use]
    pub fn get(name: &str) -> Option<&'static str> {
        ALL.iter()
            .find(|vector| vector.name == name)
            .map(|vector| vector.contents)
    }

    /// Convenience helper that returns the list of vector names.
    #[must_use = "Iterate to consume the authenticator vector names"]
    pub fn names() -> impl Iterator<Item = &'static str> {
        ALL.iter().map(|vector| vector.name)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn all_vector_files_parse() {
        for name in super::chameleon::names() {
            let contents = super::chameleon::get(name).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(contents).unwrap();
            assert!(parsed["hash_vectors"].is_array());
        }
        for name in super::authenticator::names() {
            let contents = super::authenticator::get(name).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(contents).unwrap();
            assert!(parsed["vectors"].is_array());
        }
    }

    #[test]
    fn unknown_names_yield_nothing() {
        assert!(super::chameleon::get("missing.json").is_none());
        assert!(super::authenticator::get("missing.json").is_none());
    }
}
