use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Subject-matter classification selecting which rule catalogs apply.
///
/// Parsing never fails: a tag outside the known set is kept verbatim as
/// [`Domain::Unknown`] and every catalog resolves it to an empty rule set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Domain {
    Gaming,
    Robotics,
    Hpc,
    Medical,
    Satellite,
    Sustainability,
    SpeechTherapy,
    Unknown(String),
}

impl Domain {
    /// All domains that carry rule catalogs.
    pub const KNOWN: [Domain; 7] = [
        Domain::Gaming,
        Domain::Robotics,
        Domain::Hpc,
        Domain::Medical,
        Domain::Satellite,
        Domain::Sustainability,
        Domain::SpeechTherapy,
    ];

    /// Case-folded, whitespace-trimmed parse. `speech-therapy` is accepted as an
    /// alias of `speech_therapy`.
    pub fn parse(raw: &str) -> Self {
        let folded = raw.trim().to_lowercase();
        match folded.as_str() {
            "gaming" => Domain::Gaming,
            "robotics" => Domain::Robotics,
            "hpc" => Domain::Hpc,
            "medical" => Domain::Medical,
            "satellite" => Domain::Satellite,
            "sustainability" => Domain::Sustainability,
            "speech_therapy" | "speech-therapy" => Domain::SpeechTherapy,
            _ => Domain::Unknown(folded),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Domain::Gaming => "gaming",
            Domain::Robotics => "robotics",
            Domain::Hpc => "hpc",
            Domain::Medical => "medical",
            Domain::Satellite => "satellite",
            Domain::Sustainability => "sustainability",
            Domain::SpeechTherapy => "speech_therapy",
            Domain::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Domain::Unknown(_))
    }
}

impl Default for Domain {
    fn default() -> Self {
        Domain::Unknown(String::new())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Domain::parse(s))
    }
}

impl From<&str> for Domain {
    fn from(raw: &str) -> Self {
        Domain::parse(raw)
    }
}

impl From<String> for Domain {
    fn from(raw: String) -> Self {
        Domain::parse(&raw)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.as_str().to_string()
    }
}
