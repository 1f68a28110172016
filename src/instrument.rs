//! Instrument presets
//!
//! Each instrument type has a list of named presets. A preset's config is
//! an opaque parameter object handed to the synthesis library unchanged.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Value};

/// Synthesizer voice types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
pub enum InstrumentKind {
    AMSynth,
    DuoSynth,
    FMSynth,
    MembraneSynth,
    MetalSynth,
    ModulationSynth,
    MonoSynth,
    Synth,
}

impl InstrumentKind {
    pub const ALL: [InstrumentKind; 8] = [
        Self::AMSynth,
        Self::DuoSynth,
        Self::FMSynth,
        Self::MembraneSynth,
        Self::MetalSynth,
        Self::ModulationSynth,
        Self::MonoSynth,
        Self::Synth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AMSynth => "AMSynth",
            Self::DuoSynth => "DuoSynth",
            Self::FMSynth => "FMSynth",
            Self::MembraneSynth => "MembraneSynth",
            Self::MetalSynth => "MetalSynth",
            Self::ModulationSynth => "ModulationSynth",
            Self::MonoSynth => "MonoSynth",
            Self::Synth => "Synth",
        }
    }

    /// Presets for this instrument, "Default" first
    pub fn presets(self) -> &'static [Preset] {
        PRESETS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, presets)| presets.as_slice())
            .unwrap_or(&[])
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InstrumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("Unknown instrument: {}", s))
    }
}

/// A named parameter set for one instrument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: String,
    pub config: Value,
}

impl Preset {
    fn new(name: &str, config: Value) -> Self {
        Self {
            name: name.to_string(),
            config,
        }
    }

    fn default_preset() -> Self {
        Self::new("Default", json!({}))
    }
}

static PRESETS: Lazy<Vec<(InstrumentKind, Vec<Preset>)>> = Lazy::new(|| {
    vec![
        (
            InstrumentKind::AMSynth,
            vec![
                Preset::default_preset(),
                Preset::new(
                    "Harmonics",
                    json!({
                        "harmonicity": 3.999,
                        "oscillator": { "type": "square" },
                        "envelope": { "attack": 0.03, "decay": 0.3, "sustain": 0.7, "release": 0.8 },
                        "modulation": { "volume": 12, "type": "square6" },
                        "modulationEnvelope": { "attack": 2, "decay": 3, "sustain": 0.8, "release": 0.1 }
                    }),
                ),
            ],
        ),
        (InstrumentKind::DuoSynth, vec![Preset::default_preset()]),
        (
            InstrumentKind::FMSynth,
            vec![
                Preset::default_preset(),
                Preset::new(
                    "ElectricCello",
                    json!({
                        "harmonicity": 3.01,
                        "modulationIndex": 14,
                        "oscillator": { "type": "triangle" },
                        "envelope": { "attack": 0.2, "decay": 0.3, "sustain": 0.1, "release": 1.2 },
                        "modulation": { "type": "square" },
                        "modulationEnvelope": { "attack": 0.01, "decay": 0.5, "sustain": 0.2, "release": 0.1 }
                    }),
                ),
            ],
        ),
        (InstrumentKind::MembraneSynth, vec![Preset::default_preset()]),
        (InstrumentKind::MetalSynth, vec![Preset::default_preset()]),
        (InstrumentKind::ModulationSynth, vec![Preset::default_preset()]),
        (
            InstrumentKind::MonoSynth,
            vec![
                Preset::default_preset(),
                Preset::new(
                    "Piano",
                    json!({
                        "oscillator": { "type": "sawtooth" },
                        "filter": { "Q": 2, "type": "lowpass", "rolloff": -12 },
                        "envelope": { "attack": 0.005, "decay": 3, "sustain": 0, "release": 0.45 },
                        "filterEnvelope": {
                            "attack": 0.001, "decay": 0.32, "sustain": 0.9, "release": 3,
                            "baseFrequency": 700, "octaves": 2.3
                        }
                    }),
                ),
                Preset::new(
                    "BassGuitar",
                    json!({
                        "oscillator": {
                            "type": "fmsquare5", "modulationType": "triangle",
                            "modulationIndex": 2, "harmonicity": 0.501
                        },
                        "filter": { "Q": 1, "type": "lowpass", "rolloff": -24 },
                        "envelope": { "attack": 0.01, "decay": 0.1, "sustain": 0.4, "release": 2 },
                        "filterEnvelope": {
                            "attack": 0.01, "decay": 0.1, "sustain": 0.8, "release": 1.5,
                            "baseFrequency": 50, "octaves": 4.4
                        }
                    }),
                ),
            ],
        ),
        (
            InstrumentKind::Synth,
            vec![
                Preset::default_preset(),
                Preset::new(
                    "Marimba",
                    json!({
                        "oscillator": { "partials": [1, 0, 2, 0, 3] },
                        "envelope": { "attack": 0.001, "decay": 1.2, "sustain": 0, "release": 1.2 }
                    }),
                ),
                Preset::new(
                    "Steelpan",
                    json!({
                        "oscillator": {
                            "type": "fatcustom", "partials": [0.2, 1, 0, 0.5, 0.1],
                            "spread": 40, "count": 3
                        },
                        "envelope": { "attack": 0.001, "decay": 1.6, "sustain": 0, "release": 1.6 }
                    }),
                ),
                Preset::new(
                    "TreeTrunk",
                    json!({
                        "oscillator": { "type": "sine" },
                        "envelope": { "attack": 0.001, "decay": 0.1, "sustain": 0.1, "release": 1.2 }
                    }),
                ),
            ],
        ),
    ]
});

/// Presets for an instrument by name. Unknown instruments have none.
pub fn presets(instrument: &str) -> &'static [Preset] {
    instrument
        .parse::<InstrumentKind>()
        .map(InstrumentKind::presets)
        .unwrap_or(&[])
}

pub fn find_preset(instrument: &str, name: &str) -> Option<&'static Preset> {
    presets(instrument).iter().find(|preset| preset.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_instrument_starts_with_default() {
        for kind in InstrumentKind::ALL {
            let presets = kind.presets();
            assert!(!presets.is_empty(), "{} has no presets", kind);
            assert_eq!(presets[0].name, "Default");
            assert_eq!(presets[0].config, json!({}));
        }
    }

    #[test]
    fn test_presets_by_name() {
        let names: Vec<_> = presets("Synth").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Default", "Marimba", "Steelpan", "TreeTrunk"]);
        assert_eq!(presets("MonoSynth").len(), 3);
        assert!(presets("Theremin").is_empty());
        assert!(presets("synth").is_empty());
    }

    #[test]
    fn test_find_preset_config() {
        let cello = find_preset("FMSynth", "ElectricCello").unwrap();
        assert_eq!(cello.config["modulationIndex"], json!(14));
        assert_eq!(cello.config["oscillator"]["type"], "triangle");

        let bass = find_preset("MonoSynth", "BassGuitar").unwrap();
        assert_eq!(bass.config["filter"]["rolloff"], json!(-24));
        assert!(find_preset("MonoSynth", "Marimba").is_none());
    }

    #[test]
    fn test_instrument_kind_parse() {
        assert_eq!("AMSynth".parse::<InstrumentKind>(), Ok(InstrumentKind::AMSynth));
        assert!("Kazoo".parse::<InstrumentKind>().is_err());
        for kind in InstrumentKind::ALL {
            assert_eq!(kind.to_string().parse::<InstrumentKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_preset_serializes_config_verbatim() {
        let marimba = find_preset("Synth", "Marimba").unwrap();
        let value = serde_json::to_value(marimba).unwrap();
        assert_eq!(value["name"], "Marimba");
        assert_eq!(value["config"]["oscillator"]["partials"], json!([1, 0, 2, 0, 3]));
    }
}
