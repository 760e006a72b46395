use std::str::FromStr;

use crate::error::GalleryError;

const ALGORITHM_KEY: &str = "algorithm";

/// Ordered key/value parameters of one algorithm application.
///
/// Order is preserved on the wire, both as query string and as multipart fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgorithmParams {
    pairs: Vec<(String, String)>,
}

impl AlgorithmParams {
    /// Starts a parameter set with `algorithm=<name>`.
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            pairs: vec![(ALGORITHM_KEY.to_string(), algorithm.into())],
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Appends a parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.get(ALGORITHM_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Parses `blur size=3 type=M`, `algorithm=blur&size=3` or `blur,size=3`.
/// A leading token without `=` names the algorithm.
impl FromStr for AlgorithmParams {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut params = AlgorithmParams::default();
        let tokens = s
            .split(|c: char| c == '&' || c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty());
        for (idx, token) in tokens.enumerate() {
            match token.split_once('=') {
                Some((key, _)) if key.is_empty() => {
                    return Err(GalleryError::InvalidRequest(format!(
                        "parameter '{token}' has no name"
                    )));
                }
                Some((key, value)) => params.pairs.push((key.to_string(), value.to_string())),
                None if idx == 0 => params
                    .pairs
                    .push((ALGORITHM_KEY.to_string(), token.to_string())),
                None => {
                    return Err(GalleryError::InvalidRequest(format!(
                        "parameter '{token}' is missing a value"
                    )));
                }
            }
        }
        if params.is_empty() {
            return Err(GalleryError::InvalidRequest(
                "no algorithm parameters given".to_string(),
            ));
        }
        Ok(params)
    }
}
