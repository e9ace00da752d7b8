//! Settings from which an accumulator manager can be built.

use crate::{
    accumulator::{Element, Params, SecretKey},
    error::{AccumulatorError, Result},
    kb_universal::KbUniversalAccumulatorManager,
    persistence::{InitialElementsStore, KbUniversalState},
    positive::PositiveAccumulatorManager,
    universal::UniversalAccumulatorManager,
};
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_SIZE: u64 = 100;
const DEFAULT_BATCH_SIZE: usize = 100;

/// Keyed material and sizing for an accumulator manager.
///
/// Every field may be omitted when deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulatorConfig {
    /// Label the params are derived from, see [`Params::new`]
    pub params_label: Option<String>,
    /// The manager's secret key
    pub secret_key: Option<SecretKey>,
    /// Upper bound on the members of a universal accumulator
    pub max_size: u64,
    /// Chunk size for initialization and `d` computation in a universal accumulator
    pub batch_size: usize,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            params_label: None,
            secret_key: None,
            max_size: DEFAULT_MAX_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl AccumulatorConfig {
    /// The params for the configured label
    pub fn params(&self) -> Result<Params> {
        self.params_label
            .as_deref()
            .map(|label| Params::new(label.as_bytes()))
            .ok_or(AccumulatorError::MissingParams)
    }

    /// A copy of the configured secret key. The config keeps its own copy until dropped.
    pub fn secret_key(&self) -> Result<SecretKey> {
        self.secret_key.ok_or(AccumulatorError::MissingSecretKey)
    }

    /// A fresh positive accumulator manager
    pub fn positive_manager(&self) -> Result<PositiveAccumulatorManager> {
        let params = self.params()?;
        Ok(PositiveAccumulatorManager::new(&params, self.secret_key()?))
    }

    /// A fresh universal accumulator manager that records its initial elements in `store`
    pub fn universal_manager<I: InitialElementsStore>(
        &self,
        store: I,
    ) -> Result<UniversalAccumulatorManager<I>> {
        let params = self.params()?;
        Ok(UniversalAccumulatorManager::initialize(
            &params,
            self.secret_key()?,
            self.max_size,
            store,
            self.batch_size,
        ))
    }

    /// A fresh KB-universal accumulator manager over `domain`
    pub fn kb_universal_manager(
        &self,
        domain: &[Element],
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<KbUniversalAccumulatorManager> {
        let params = self.params()?;
        Ok(KbUniversalAccumulatorManager::initialize(
            &params,
            self.secret_key()?,
            domain,
            state,
        ))
    }
}
