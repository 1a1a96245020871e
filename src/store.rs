// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{BlobStore, STORE_KEY};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    ActivePeriod, Preferences, RawTransaction, StoreData, Transaction, TxDate, TxType,
};
use crate::period::{default_period, Period};
use chrono::NaiveDate;
use log::{debug, error, warn};
use serde_json::Value;

/// Outcome of a mutation. The in-memory ledger always holds the change;
/// `storage_error` is set when the blob could not be written.
#[must_use]
#[derive(Debug)]
pub struct Persisted<T> {
    pub value: T,
    pub storage_error: Option<LedgerError>,
}

impl<T> Persisted<T> {
    pub fn is_saved(&self) -> bool {
        self.storage_error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub r#type: TxType,
    pub category: String,
    pub amount: i64,
    pub account: Option<String>,
    pub note: Option<String>,
}

/// The ledger and the blob store it mirrors. Every mutation writes the
/// whole document back before returning.
///
/// Stored records that fail to parse are held verbatim in `unreadable` and
/// written back with every save, so loading never loses data.
pub struct Ledger<S: BlobStore> {
    store: S,
    data: StoreData,
    unreadable: Vec<Value>,
    today: NaiveDate,
}

impl<S: BlobStore> Ledger<S> {
    /// Hydrate from the store. Missing or unreadable state falls back to defaults.
    pub fn load(store: S, today: NaiveDate) -> Self {
        let (data, unreadable) = match store.get(STORE_KEY) {
            Ok(Some(raw)) => hydrate(&raw, today).unwrap_or_else(|e| {
                warn!("{}; starting from defaults", e);
                (defaults(today), Vec::new())
            }),
            Ok(None) => {
                debug!("no persisted ledger under '{}'", STORE_KEY);
                (defaults(today), Vec::new())
            }
            Err(e) => {
                warn!("could not read persisted ledger: {:#}; starting from defaults", e);
                (defaults(today), Vec::new())
            }
        };
        debug!(
            "loaded {} transactions ({} unreadable)",
            data.transactions.len(),
            unreadable.len()
        );
        Self {
            store,
            data,
            unreadable,
            today,
        }
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.data.transactions
    }

    /// Stored transaction records that could not be parsed, as found.
    pub fn unreadable_records(&self) -> &[Value] {
        &self.unreadable
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data.preferences
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn active_period(&self) -> Period {
        self.data
            .active_period
            .as_ref()
            .and_then(|a| Period::from_active(a).ok())
            .unwrap_or_else(|| default_period(self.today))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn document(&self) -> serde_json::Result<String> {
        let mut doc = serde_json::to_value(&self.data)?;
        if let Some(Value::Array(items)) = doc.get_mut("transactions") {
            items.extend(self.unreadable.iter().cloned());
        }
        serde_json::to_string(&doc)
    }

    fn persist(&mut self) -> Option<LedgerError> {
        let doc = match self.document() {
            Ok(doc) => doc,
            Err(e) => return Some(LedgerError::StorageUnavailable(e.to_string())),
        };
        match self.store.set(STORE_KEY, &doc) {
            Ok(()) => {
                debug!("persisted {} bytes under '{}'", doc.len(), STORE_KEY);
                None
            }
            Err(e) => {
                error!("failed to persist ledger: {:#}", e);
                Some(LedgerError::StorageUnavailable(format!("{:#}", e)))
            }
        }
    }

    fn persisted<T>(&mut self, value: T) -> Persisted<T> {
        let storage_error = self.persist();
        Persisted {
            value,
            storage_error,
        }
    }

    /// One past the largest id in the store, unreadable records included.
    pub fn next_id(&self) -> LedgerResult<i64> {
        let kept = self.unreadable.iter().filter_map(|v| v.get("id")?.as_i64());
        self.data
            .transactions
            .iter()
            .map(|t| t.id)
            .chain(kept)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| LedgerError::Validation(vec!["No transaction ids left".to_string()]))
    }

    /// Validate a new entry, assign it the next id and store it.
    pub fn add_transaction(&mut self, new: NewTransaction) -> LedgerResult<Persisted<Transaction>> {
        let mut problems = Vec::new();
        if new.amount <= 0 {
            problems.push("Amount must be greater than 0".to_string());
        }
        if new.category.trim().is_empty() {
            problems.push("Category is required".to_string());
        }
        if new.date > self.today {
            problems.push("Date cannot be later than today".to_string());
        }
        if !problems.is_empty() {
            return Err(LedgerError::Validation(problems));
        }

        let tx = Transaction {
            id: self.next_id()?,
            date: TxDate::from(new.date),
            r#type: new.r#type,
            category: new.category.trim().to_string(),
            amount: new.amount,
            account: new.account.filter(|s| !s.trim().is_empty()),
            note: new.note.filter(|s| !s.trim().is_empty()),
        };
        self.data.transactions.push(tx.clone());
        Ok(self.persisted(tx))
    }

    /// Remember the last-viewed window. A reversed range is kept as given.
    pub fn set_active_period(&mut self, period: Period) -> Persisted<()> {
        self.data.active_period = Some(period.to_active());
        self.persisted(())
    }

    pub fn reset_active_period(&mut self) -> Persisted<Period> {
        let period = default_period(self.today);
        self.data.active_period = Some(period.to_active());
        self.persisted(period)
    }

    /// Overwrite preferences wholesale.
    pub fn set_preferences(&mut self, prefs: Preferences) -> Persisted<()> {
        self.data.preferences = prefs;
        self.persisted(())
    }

    /// Merge business name/type into the current preferences.
    pub fn save_profile(
        &mut self,
        business_name: Option<String>,
        business_type: Option<String>,
    ) -> Persisted<Preferences> {
        let mut prefs = self.data.preferences.clone();
        if let Some(name) = business_name {
            prefs.business_name = name;
        }
        if let Some(kind) = business_type {
            prefs.business_type = Some(kind);
        }
        self.data.preferences = prefs.clone();
        self.persisted(prefs)
    }

    /// Drop every transaction, unreadable ones too, keeping preferences and
    /// the active period.
    pub fn clear_transactions(&mut self) -> Persisted<usize> {
        let n = self.data.transactions.len() + self.unreadable.len();
        self.data.transactions.clear();
        self.unreadable.clear();
        self.persisted(n)
    }

    /// Replace the transaction list, and preferences when given. No merge.
    pub fn replace(
        &mut self,
        transactions: Vec<Transaction>,
        preferences: Option<Preferences>,
    ) -> Persisted<usize> {
        let n = transactions.len();
        self.data.transactions = transactions;
        self.unreadable.clear();
        if let Some(prefs) = preferences {
            self.data.preferences = prefs;
        }
        self.persisted(n)
    }

    /// Remove the persisted blob and fall back to defaults in memory.
    pub fn reset(&mut self) -> LedgerResult<()> {
        self.data = defaults(self.today);
        self.unreadable.clear();
        self.store.remove(STORE_KEY).map_err(|e| {
            error!("failed to remove persisted ledger: {:#}", e);
            LedgerError::StorageUnavailable(format!("{:#}", e))
        })
    }
}

fn defaults(today: NaiveDate) -> StoreData {
    StoreData {
        transactions: Vec::new(),
        preferences: Preferences::default(),
        active_period: Some(default_period(today).to_active()),
    }
}

/// Parse a persisted blob. Only an unreadable document is an error; bad
/// sections fall back to their defaults and bad records are set aside
/// unchanged, second in the returned pair.
fn hydrate(raw: &str, today: NaiveDate) -> LedgerResult<(StoreData, Vec<Value>)> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| LedgerError::MalformedPersistedState(e.to_string()))?;
    let Value::Object(mut obj) = doc else {
        return Err(LedgerError::MalformedPersistedState(
            "top-level value is not an object".into(),
        ));
    };

    let mut transactions = Vec::new();
    let mut unreadable = Vec::new();
    match obj.remove("transactions") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.into_iter().enumerate() {
                match ingest(item.clone()) {
                    Ok(t) => transactions.push(t),
                    Err(e) => {
                        warn!(
                            "{}",
                            LedgerError::MalformedPersistedState(format!(
                                "transaction #{}: {}",
                                i, e
                            ))
                        );
                        unreadable.push(item);
                    }
                }
            }
        }
        Some(other) => {
            warn!(
                "{}",
                LedgerError::MalformedPersistedState("transactions is not a list".into())
            );
            unreadable.push(other);
        }
    }

    let preferences = match obj.remove("preferences") {
        None | Some(Value::Null) => Preferences::default(),
        Some(v) => serde_json::from_value(v).unwrap_or_else(|e| {
            warn!(
                "{}",
                LedgerError::MalformedPersistedState(format!("preferences: {}", e))
            );
            Preferences::default()
        }),
    };

    let active_period = obj
        .remove("activePeriod")
        .and_then(|v| serde_json::from_value::<ActivePeriod>(v).ok())
        .filter(|a| match Period::from_active(a) {
            Ok(_) => true,
            Err(e) => {
                warn!("ignoring stored active period: {}", e);
                false
            }
        })
        .or_else(|| Some(default_period(today).to_active()));

    Ok((
        StoreData {
            transactions,
            preferences,
            active_period,
        },
        unreadable,
    ))
}

/// Parse one stored record, rejecting unknown transaction types.
pub fn ingest(item: Value) -> LedgerResult<Transaction> {
    let raw: RawTransaction = serde_json::from_value(item)
        .map_err(|e| LedgerError::MalformedPersistedState(e.to_string()))?;
    Transaction::try_from(raw)
}
