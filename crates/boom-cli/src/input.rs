//! Chromosome file loading.

use std::path::Path;

use boom_core::{Chromosome, SetupError};

use crate::error::CliError;

/// On-disk chromosome encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromosomeFormat {
    /// JSON array of `{tick, kind, target}` objects.
    Raw,
    /// JSON array of integer gene codes, one per tick.
    Genes,
}

/// Read and decode one chromosome file.
pub fn load_chromosome(path: &Path, format: ChromosomeFormat) -> Result<Chromosome, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_chromosome(&contents, format)
}

/// Decode chromosome text in the given format.
pub fn parse_chromosome(contents: &str, format: ChromosomeFormat) -> Result<Chromosome, CliError> {
    let chromosome = match format {
        ChromosomeFormat::Raw => Chromosome::from_json(contents)?,
        ChromosomeFormat::Genes => {
            let genes: Vec<i64> = serde_json::from_str(contents).map_err(SetupError::from)?;
            Chromosome::from_genes(&genes)?
        }
    };
    Ok(chromosome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boom_types::ActionKind;

    use super::*;

    #[test]
    fn raw_and_gene_files_decode_alike() {
        let raw = parse_chromosome(
            r#"[{"tick": 0, "kind": "assign_food"}, {"tick": 2, "kind": "train_villager"}]"#,
            ChromosomeFormat::Raw,
        )
        .unwrap();
        let genes = parse_chromosome("[2, 0, 1]", ChromosomeFormat::Genes).unwrap();
        assert_eq!(raw, genes);
        assert_eq!(
            raw.actions_at(2).first().map(boom_types::Action::kind),
            Some(ActionKind::TrainVillager)
        );
    }

    #[test]
    fn targeted_raw_action_decodes() {
        let chromosome = parse_chromosome(
            r#"[{"tick": 1, "kind": "assign_wood", "target": 2}]"#,
            ChromosomeFormat::Raw,
        )
        .unwrap();
        assert_eq!(chromosome.len(), 1);
    }

    #[test]
    fn bad_gene_is_a_setup_error() {
        let err = parse_chromosome("[0, 7]", ChromosomeFormat::Genes).unwrap_err();
        assert!(matches!(
            err,
            CliError::Setup {
                source: SetupError::UnknownGene { .. }
            }
        ));
    }

    #[test]
    fn gene_file_must_be_integers() {
        let err = parse_chromosome(r#"["food"]"#, ChromosomeFormat::Genes).unwrap_err();
        assert!(matches!(
            err,
            CliError::Setup {
                source: SetupError::Json { .. }
            }
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_chromosome(Path::new("/nonexistent/orders.json"), ChromosomeFormat::Raw)
            .unwrap_err();
        assert!(err.to_string().contains("orders.json"));
    }
}
