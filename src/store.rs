//! The live tree and its read-modify-persist-notify protocol.
//!
//! # Responsibility
//! - Own the single in-memory tree and hand out read-only views of it.
//! - Run every mutation, then re-default, persist and notify.
//!
//! # Invariants
//! - Silent mutations persist but never notify.
//! - A rejected replacement or import leaves the live tree untouched.
//! - Unreadable stored state falls back to the seed instead of failing `open`.

use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;

use crate::bus::{ListenerError, SubscriptionBus, SubscriptionId};
use crate::error::AppError;
use crate::migrate::{ensure_state_shape, migrate_state, migrate_state_on, parse_document, validate_candidate};
use crate::model::Tree;
use crate::rules::cascade_after_parent_change;
use crate::schema::{create_default_state, create_seed_state, today};

/// Key under which the serialized tree is stored.
pub const STORAGE_KEY: &str = "covey_v2_domain_model";

/// Durable home of the serialized tree.
#[allow(async_fn_in_trait)]
pub trait Persistence {
    /// Returns `None` when nothing was ever written.
    async fn read(&self) -> Result<Option<String>, AppError>;
    async fn write(&mut self, text: &str) -> Result<(), AppError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Seeded,
    Loaded,
    Recovered { reason: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutateOptions {
    pub silent: bool,
}

impl MutateOptions {
    pub const SILENT: Self = Self { silent: true };
}

pub struct Store<P: Persistence> {
    tree: Tree,
    persistence: P,
    bus: SubscriptionBus,
}

impl<P: Persistence> Store<P> {
    pub async fn open(persistence: P) -> Result<(Self, LoadOutcome), AppError> {
        Self::open_on(persistence, today()).await
    }

    /// Loads the stored tree, seeding with `seed_day` when none is usable.
    pub async fn open_on(persistence: P, seed_day: NaiveDate) -> Result<(Self, LoadOutcome), AppError> {
        let (tree, outcome) = match persistence.read().await? {
            None => (create_seed_state(seed_day), LoadOutcome::Seeded),
            Some(text) => match load_document(&text, seed_day) {
                Ok(tree) => (tree, LoadOutcome::Loaded),
                Err(err) => {
                    warn!(
                        "event=state_recovered module=store status=warn reason={}",
                        err
                    );
                    (
                        create_seed_state(seed_day),
                        LoadOutcome::Recovered {
                            reason: err.to_string(),
                        },
                    )
                }
            },
        };
        info!(
            "event=state_loaded module=store status=ok roles={} next_id={}",
            tree.roles.len(),
            tree.next_id
        );
        let store = Self {
            tree,
            persistence,
            bus: SubscriptionBus::new(),
        };
        Ok((store, outcome))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Deep copy independent of the live tree.
    pub fn snapshot(&self) -> Tree {
        self.tree.clone()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn serialize(&self, pretty: bool) -> Result<String, AppError> {
        serialize_state(&self.tree, pretty)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Tree) -> Result<(), ListenerError> + 'static,
    {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Applies `mutator` to the live tree and returns its result.
    pub async fn mutate<R, F>(&mut self, mutator: F, options: MutateOptions) -> Result<R, AppError>
    where
        F: FnOnce(&mut Tree) -> R,
    {
        let result = mutator(&mut self.tree);
        self.commit(options).await?;
        Ok(result)
    }

    /// Like [`Store::mutate`], but `mutator` works on a draft of the tree.
    ///
    /// An `Err` discards the draft, so the live tree is left as it was and
    /// nothing is persisted or notified.
    pub async fn try_mutate<R, F>(
        &mut self,
        mutator: F,
        options: MutateOptions,
    ) -> Result<R, AppError>
    where
        F: FnOnce(&mut Tree) -> Result<R, AppError>,
    {
        let mut draft = self.tree.clone();
        let result = mutator(&mut draft)?;
        self.tree = draft;
        self.commit(options).await?;
        Ok(result)
    }

    /// Swaps in a migrated copy of `candidate`. Always notifies.
    pub async fn replace(&mut self, candidate: &Value) -> Result<(), AppError> {
        let mut tree = migrate_state(candidate)?;
        let adjusted = cascade_after_parent_change(&mut tree);
        self.tree = tree;
        info!(
            "event=state_replaced module=store status=ok roles={} clamped={}",
            self.tree.roles.len(),
            adjusted
        );
        self.commit(MutateOptions::default()).await
    }

    /// Parses and validates an exported document, then replaces the tree with it.
    pub async fn import_document(&mut self, text: &str) -> Result<(), AppError> {
        let candidate = parse_document(text)?;
        validate_candidate(&candidate)?;
        self.replace(&candidate).await
    }

    pub async fn clear(&mut self) -> Result<(), AppError> {
        self.tree = create_default_state();
        info!("event=state_cleared module=store status=ok seeded=false");
        self.commit(MutateOptions::default()).await
    }

    pub async fn reset_to_seed(&mut self, today: NaiveDate) -> Result<(), AppError> {
        self.tree = create_seed_state(today);
        info!("event=state_cleared module=store status=ok seeded=true");
        self.commit(MutateOptions::default()).await
    }

    /// Writes the tree one last time and hands the persistence back.
    pub async fn close(mut self) -> Result<P, AppError> {
        self.persist().await?;
        Ok(self.persistence)
    }

    async fn commit(&mut self, options: MutateOptions) -> Result<(), AppError> {
        ensure_state_shape(&mut self.tree);
        self.persist().await?;
        if !options.silent {
            self.bus.notify(&self.tree);
        }
        Ok(())
    }

    async fn persist(&mut self) -> Result<(), AppError> {
        let text = serialize_state(&self.tree, false)?;
        self.persistence.write(&text).await
    }
}

pub fn serialize_state(tree: &Tree, pretty: bool) -> Result<String, AppError> {
    let text = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    Ok(text)
}

fn load_document(text: &str, seed_day: NaiveDate) -> Result<Tree, AppError> {
    let candidate = parse_document(text)?;
    validate_candidate(&candidate)?;
    let mut tree = migrate_state_on(&candidate, seed_day)?;
    cascade_after_parent_change(&mut tree);
    Ok(tree)
}
