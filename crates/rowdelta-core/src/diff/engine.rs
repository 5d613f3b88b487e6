//! Row-change computation engine.
//!
//! The core entry point is [`compute_changes`], which accepts a before- and
//! an after-[`Snapshot`] of the same logical table or query and produces the
//! ordered [`Changes`] between them.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use crate::diff::model::{Change, ChangeType, Changes};
use crate::errors::{ExError, Result, RowDeltaError};
use crate::model::{Row, Snapshot, ValueKey};
use crate::{log_op_end, log_op_error, log_op_start};

/// Compute the classified row changes between two snapshots.
///
/// Rows are matched by primary-key tuple. Changes are emitted by walking
/// the before-snapshot in row order (deletions and modifications), then
/// the rows only present in the after-snapshot in row order (creations).
/// Rows present on both sides with identical values over their shared
/// columns produce nothing.
///
/// When a snapshot holds several rows with the same key, the last one wins
/// and the earlier ones are ignored. Null key components equal each other,
/// so rows with all-null keys collapse into one logical row.
///
/// When neither snapshot has a primary key, rows are matched by their full
/// value tuple over the shared columns, as a multiset; such diffs only ever
/// contain creations and deletions.
///
/// # Errors
///
/// - `PrimaryKeyMismatch` - the snapshots do not declare the same primary
///   key columns (compared with the primary-key letter case). No change is
///   computed in that case.
pub fn compute_changes(before: &Snapshot, after: &Snapshot) -> Result<Changes> {
    log_op_start!(
        "compute_changes",
        data_name = before.name(),
        before_rows = before.row_count() as u64,
        after_rows = after.row_count() as u64
    );
    let start = Instant::now();

    let changes = compute_changes_impl(before, after).map_err(|e| {
        log_op_error!(
            "compute_changes",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "compute_changes",
        duration_ms = start.elapsed().as_millis() as u64,
        change_count = changes.len() as u64,
        creations = changes.count_of(ChangeType::Creation) as u64,
        modifications = changes.count_of(ChangeType::Modification) as u64,
        deletions = changes.count_of(ChangeType::Deletion) as u64
    );

    Ok(changes)
}

/// Compute changes, keyed on an explicit primary key.
///
/// A non-empty `primary_key` re-keys both snapshots before diffing; an
/// empty one uses the keys the snapshots declare.
///
/// # Errors
///
/// - `ColumnNotFound` - a key column is missing from either snapshot
/// - `PrimaryKeyMismatch` - see [`compute_changes`]
pub fn diff<S: AsRef<str>>(
    before: &Snapshot,
    after: &Snapshot,
    primary_key: &[S],
) -> Result<Changes> {
    if primary_key.is_empty() {
        return compute_changes(before, after);
    }
    let before = before.with_primary_key(primary_key)?;
    let after = after.with_primary_key(primary_key)?;
    compute_changes(&before, &after)
}

fn compute_changes_impl(before: &Snapshot, after: &Snapshot) -> Result<Changes> {
    check_primary_keys(before, after)?;

    let shared = shared_columns(before, after);
    let changes = if before.primary_key().is_empty() {
        keyless_changes(before, after, &shared)
    } else {
        keyed_changes(before, after, &shared)
    };

    Ok(Changes::new(changes, *before.settings()))
}

fn check_primary_keys(before: &Snapshot, after: &Snapshot) -> Result<()> {
    let pk_case = before.settings().primary_key();
    let same = before.primary_key().len() == after.primary_key().len()
        && before
            .primary_key()
            .iter()
            .zip(after.primary_key())
            .all(|(a, b)| pk_case.eq_str(a, b));
    if same {
        return Ok(());
    }
    Err(ExError::from(RowDeltaError::PrimaryKeyMismatch {
        data_name: before.name().to_string(),
        before: before.primary_key().to_vec(),
        after: after.primary_key().to_vec(),
    })
    .with_op("compute_changes"))
}

/// Pairs of (before index, after index) for columns present on both sides,
/// in before-column order.
fn shared_columns(before: &Snapshot, after: &Snapshot) -> Vec<(usize, usize)> {
    let after_names = after.column_names();
    let column_case = before.settings().column();
    before
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(bi, column)| {
            column_case
                .position_in(&after_names, &column.name)
                .map(|ai| (bi, ai))
        })
        .collect()
}

fn modified_columns(
    before: &Snapshot,
    before_row: &Row,
    after_row: &Row,
    shared: &[(usize, usize)],
) -> Vec<String> {
    shared
        .iter()
        .filter(|(bi, ai)| !before_row.values()[*bi].same_as(&after_row.values()[*ai]))
        .map(|(bi, _)| before.columns()[*bi].name.clone())
        .collect()
}

/// Map each key to the index of the last row carrying it.
fn index_by_key(keys: &[Vec<ValueKey>]) -> HashMap<&[ValueKey], usize> {
    let mut index = HashMap::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        index.insert(key.as_slice(), i);
    }
    index
}

fn keyed_changes(before: &Snapshot, after: &Snapshot, shared: &[(usize, usize)]) -> Vec<Change> {
    let kind = before.kind();
    let name = before.name();
    let pk_names = before.primary_key();

    let before_keys: Vec<Vec<ValueKey>> = before.rows().iter().map(|r| r.pk_key()).collect();
    let after_keys: Vec<Vec<ValueKey>> = after.rows().iter().map(|r| r.pk_key()).collect();
    let before_index = index_by_key(&before_keys);
    let after_index = index_by_key(&after_keys);

    let shadowed = (before_keys.len() - before_index.len()) + (after_keys.len() - after_index.len());
    if shadowed > 0 {
        tracing::debug!(
            component = module_path!(),
            data_name = name,
            shadowed = shadowed as u64,
            "duplicate primary keys, keeping the last row of each"
        );
    }

    let mut changes = Vec::new();

    for (i, (row, key)) in before.rows().iter().zip(&before_keys).enumerate() {
        if before_index.get(key.as_slice()) != Some(&i) {
            continue;
        }
        match after_index.get(key.as_slice()) {
            None => changes.push(Change::deletion(kind, name, pk_names, Arc::clone(row))),
            Some(&j) => {
                let after_row = &after.rows()[j];
                let modified = modified_columns(before, row, after_row, shared);
                if !modified.is_empty() {
                    changes.push(Change::modification(
                        kind,
                        name,
                        pk_names,
                        Arc::clone(row),
                        Arc::clone(after_row),
                        modified,
                    ));
                }
            }
        }
    }

    for (j, (row, key)) in after.rows().iter().zip(&after_keys).enumerate() {
        if after_index.get(key.as_slice()) != Some(&j) {
            continue;
        }
        if !before_index.contains_key(key.as_slice()) {
            changes.push(Change::creation(kind, name, pk_names, Arc::clone(row)));
        }
    }

    changes
}

fn keyless_changes(before: &Snapshot, after: &Snapshot, shared: &[(usize, usize)]) -> Vec<Change> {
    let kind = before.kind();
    let name = before.name();

    let mut pool: HashMap<Vec<ValueKey>, VecDeque<usize>> = HashMap::new();
    for (j, row) in after.rows().iter().enumerate() {
        let key = shared.iter().map(|(_, ai)| row.values()[*ai].key()).collect();
        pool.entry(key).or_default().push_back(j);
    }

    let mut matched = vec![false; after.row_count()];
    let mut changes = Vec::new();

    for row in before.rows() {
        let key: Vec<ValueKey> = shared.iter().map(|(bi, _)| row.values()[*bi].key()).collect();
        match pool.get_mut(&key).and_then(VecDeque::pop_front) {
            Some(j) => matched[j] = true,
            None => changes.push(Change::deletion(kind, name, &[], Arc::clone(row))),
        }
    }

    for (row, _) in after.rows().iter().zip(&matched).filter(|(_, m)| !**m) {
        changes.push(Change::creation(kind, name, &[], Arc::clone(row)));
    }

    changes
}
