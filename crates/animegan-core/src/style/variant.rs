//! Pre-trained AnimeGANv3 model variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the interchangeable AnimeGANv3 generator checkpoints.
///
/// All variants share the same tensor interface and differ only in weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelVariant {
    #[default]
    H40,
    H50,
    H64,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 3] = [ModelVariant::H40, ModelVariant::H50, ModelVariant::H64];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::H40 => "H40",
            ModelVariant::H50 => "H50",
            ModelVariant::H64 => "H64",
        }
    }

    /// Asset file name inside the model directory.
    pub fn file_name(self) -> String {
        format!("animeganv3_{}_model.onnx", self.as_str())
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown model variant {s:?} (expected H40, H50 or H64)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(ModelVariant::H40.file_name(), "animeganv3_H40_model.onnx");
        assert_eq!(ModelVariant::H50.file_name(), "animeganv3_H50_model.onnx");
        assert_eq!(ModelVariant::H64.file_name(), "animeganv3_H64_model.onnx");
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("h50".parse::<ModelVariant>(), Ok(ModelVariant::H50));
        assert_eq!("H64".parse::<ModelVariant>(), Ok(ModelVariant::H64));
        assert!("H32".parse::<ModelVariant>().is_err());
    }

    #[test]
    fn test_default_is_h40() {
        assert_eq!(ModelVariant::default(), ModelVariant::H40);
    }
}
