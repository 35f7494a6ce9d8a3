//! Per-use-case orchestration: reference call (or cached baseline), version
//! call, comparison, and recording into the store

use regress_config::{keys, Config};
use regress_store::{HttpStatus, UseCaseStore};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::client::{ApiCallResult, ApiClient};
use crate::compare::{compare_json, DifferenceSet};
use crate::error::UseCaseError;

/// How one use case ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Both servers answered 200 with the same top-level values
    Identical,
    /// Both servers answered 200 but some top-level keys differ
    Differences(DifferenceSet),
    /// At least one side did not answer exactly 200; nothing was compared
    HttpFailure {
        reference: HttpStatus,
        version: HttpStatus,
    },
    /// Processing raised an error, recorded into the use case's result
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Identical)
    }

    /// Contribution to the run's failure tally (0 or 1)
    pub fn failures(&self) -> usize {
        usize::from(self.is_failure())
    }
}

/// Outcomes of a complete pass over the store
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(String, Outcome)>,
}

impl RunSummary {
    pub fn record(&mut self, name: impl Into<String>, outcome: Outcome) {
        self.outcomes.push((name.into(), outcome));
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of use cases that differed or errored
    pub fn failures(&self) -> usize {
        self.outcomes.iter().map(|(_, o)| o.failures()).sum()
    }

    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| o)
    }

    /// Print the final one-line summary
    pub fn print(&self) {
        let failures = self.failures();
        if failures > 0 {
            println!(
                "\n=== Résumé : {} différences ou erreurs détectées ===",
                failures
            );
        } else {
            println!("\n=== Résumé : Aucune différence ou erreur détectée ===");
        }
    }
}

/// Drives every use case of a store against the two configured servers
pub struct Runner<'a> {
    config: &'a Config,
    client: ApiClient,
    store: UseCaseStore,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a Config, client: ApiClient, store: UseCaseStore) -> Self {
        Self {
            config,
            client,
            store,
        }
    }

    /// Process every use case in store order, one after the other
    pub async fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();

        for name in self.store.names() {
            println!("\n=== Début du traitement pour {} ===", name);
            let outcome = match self.process(&name).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(
                        "Erreur inattendue lors du traitement du UseCase {} : {}",
                        name, e
                    );
                    println!("Erreur inattendue pour le UseCase {} : {}", name, e);
                    Outcome::Failed(e.to_string())
                }
            };
            summary.record(name.as_str(), outcome);
            println!("=== Fin du traitement pour {} ===", name);
        }

        summary
    }

    /// Process one use case, recording any error into its result
    ///
    /// `Err` is only returned when recording the error itself fails.
    pub async fn process(&mut self, name: &str) -> Result<Outcome, UseCaseError> {
        match self.compare_use_case(name).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let message = e.to_string();
                error!("Erreur sur le UseCase {} : {}", name, message);

                let data = match self.store.get_mut(name) {
                    Some(use_case) => {
                        use_case.record_error(message.as_str());
                        serde_json::to_value(&*use_case)?
                    }
                    None => json!({ "result": { "error": message } }),
                };
                self.store.save().await?;

                println!("\nErreur sur le {} : {}", name, message);
                println!("Données du UseCase : {}", serde_json::to_string_pretty(&data)?);
                Ok(Outcome::Failed(message))
            }
        }
    }

    async fn compare_use_case(&mut self, name: &str) -> Result<Outcome, UseCaseError> {
        let use_case = self.store.get(name).ok_or_else(|| UseCaseError::NotFound {
            name: name.to_string(),
        })?;
        let payload = use_case
            .payload
            .clone()
            .ok_or_else(|| UseCaseError::MissingPayload {
                name: name.to_string(),
            })?;

        let reference = match use_case.cached_reference() {
            Some((status, result)) => {
                info!("Résultat existant trouvé pour le {}", name);
                ApiCallResult::Response {
                    status,
                    body: Some(result.clone()),
                }
            }
            None => {
                info!(
                    "Aucun résultat trouvé pour le {}, récupération en cours...",
                    name
                );
                let url_ref = self.config.require(keys::URL_REF)?;
                let reference = self.client.post_analysis(url_ref, &payload).await;
                self.record_reference(name, &reference).await?;
                reference
            }
        };

        let url_version = self.config.require(keys::URL_VERSION)?;
        let version = self.client.post_analysis(url_version, &payload).await;

        if !reference.status().is_ok() || !version.status().is_ok() {
            warn!("Erreur HTTP pour le {}", name);
            warn!(
                "Référence - Code HTTP : {}, Réponse : {}",
                reference.status(),
                reference.describe()
            );
            warn!(
                "Version - Code HTTP : {}, Réponse : {}",
                version.status(),
                version.describe()
            );
            return Ok(Outcome::HttpFailure {
                reference: reference.status(),
                version: version.status(),
            });
        }

        if let Some(use_case) = self.store.get_mut(name) {
            use_case.record_result(version.recordable());
        }
        self.store.save().await?;
        info!("Résultat mis à jour pour le {}", name);

        let reference_body = reference.comparable();
        let version_body = version.comparable();
        match compare_json(&reference_body, &version_body)? {
            Some(differences) => {
                info!(
                    "Différences détectées pour le {} : {}",
                    name,
                    serde_json::to_string(&differences)?
                );
                println!("\n=== Résultats pour le : {} ===", name);
                println!("Référence:\n{}", pretty(&reference_body)?);
                println!("Version:\n{}", pretty(&version_body)?);
                println!(
                    "\n--- Différences détectées ---\n{}",
                    serde_json::to_string_pretty(&differences)?
                );
                Ok(Outcome::Differences(differences))
            }
            None => {
                println!("\n=== {} : Aucune différence détectée ===", name);
                Ok(Outcome::Identical)
            }
        }
    }

    /// Keep a successful reference answer as the baseline and flush at once
    async fn record_reference(
        &mut self,
        name: &str,
        reference: &ApiCallResult,
    ) -> Result<(), UseCaseError> {
        let ApiCallResult::Response {
            status,
            body: Some(body),
        } = reference
        else {
            return Ok(());
        };
        if !status.is_ok() {
            return Ok(());
        }

        if let Some(use_case) = self.store.get_mut(name) {
            use_case.record_reference(*status, body.clone());
        }
        self.store.save().await?;
        info!("Résultat sauvegardé pour le UseCase {}", name);
        Ok(())
    }
}

fn pretty(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_failures() {
        assert_eq!(Outcome::Identical.failures(), 0);
        assert_eq!(Outcome::Differences(DifferenceSet::new()).failures(), 1);
        assert_eq!(
            Outcome::HttpFailure {
                reference: HttpStatus::Code(500),
                version: HttpStatus::OK,
            }
            .failures(),
            1
        );
        assert_eq!(Outcome::Failed("boom".into()).failures(), 1);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record("uc1", Outcome::Identical);
        summary.record("uc2", Outcome::Failed("boom".into()));
        summary.record(
            "uc3",
            Outcome::Differences(
                compare_json(&json!({"a": 1}), &json!({"a": 2}))
                    .unwrap()
                    .unwrap(),
            ),
        );

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.failures(), 2);
        assert_eq!(summary.outcome("uc1"), Some(&Outcome::Identical));
        assert!(summary.outcome("missing").is_none());
    }
}
