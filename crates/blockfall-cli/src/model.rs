use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context as _;
use blockfall_ai::FeatureWeights;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trained weight set with its provenance, stored as pretty JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub fitness: f32,
    pub weights: FeatureWeights,
}

impl TrainedModel {
    /// Writes the model to `path`, or to stdout when no path is given.
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<()> {
        match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create model file {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, self)
                    .with_context(|| format!("failed to write model to {}", path.display()))?;
                writeln!(writer)?;
                writer.flush()?;
            }
            None => {
                let mut stdout = io::stdout().lock();
                serde_json::to_writer_pretty(&mut stdout, self)
                    .context("failed to write model to stdout")?;
                writeln!(stdout)?;
            }
        }
        Ok(())
    }

    /// Reads a model back from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open model file {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse model file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_round_trip_through_json() {
        let model = TrainedModel {
            name: "test".to_owned(),
            trained_at: Utc::now(),
            fitness: 12.5,
            weights: FeatureWeights::TUNED,
        };
        let json = serde_json::to_string_pretty(&model).unwrap();
        let back: TrainedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, model.name);
        assert_eq!(back.trained_at, model.trained_at);
        assert_eq!(back.fitness, model.fitness);
        assert_eq!(back.weights, model.weights);
    }
}
