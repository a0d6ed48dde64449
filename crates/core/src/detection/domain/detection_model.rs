use std::fmt;
use std::str::FromStr;

/// Which detection model the external backend should run.
///
/// `Hog` is the fast CPU model; `Cnn` is the slower, more accurate one.
/// Not every backend supports both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetectionModel {
    #[default]
    Hog,
    Cnn,
}

impl DetectionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionModel::Hog => "hog",
            DetectionModel::Cnn => "cnn",
        }
    }
}

impl fmt::Display for DetectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hog" => Ok(DetectionModel::Hog),
            "cnn" => Ok(DetectionModel::Cnn),
            other => Err(format!("Detection model must be 'hog' or 'cnn', got '{other}'")),
        }
    }
}
