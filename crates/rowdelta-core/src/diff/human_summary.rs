//! Human-readable rendering of change lists.

use crate::diff::model::{Change, ChangeType, Changes};
use crate::model::Value;

/// Render a plain-text summary of [`Changes`].
///
/// One header line with the per-type counts, then one line per change in
/// emission order. Modifications list each modified column as
/// `COLUMN: before -> after`.
///
/// ```
/// use rowdelta_core::diff::{render_changes, Changes};
///
/// assert_eq!(render_changes(&Changes::default()), "No changes.\n");
/// ```
pub fn render_changes(changes: &Changes) -> String {
    if changes.is_empty() {
        return "No changes.\n".to_string();
    }

    let mut out = format!(
        "{} change(s): {} creation(s), {} modification(s), {} deletion(s)\n",
        changes.len(),
        changes.count_of(ChangeType::Creation),
        changes.count_of(ChangeType::Modification),
        changes.count_of(ChangeType::Deletion),
    );

    for change in changes {
        out.push_str(&render_change(change));
    }
    out
}

fn render_change(change: &Change) -> String {
    let mut line = format!(
        "{} {} {}",
        change.change_type(),
        change.data_kind(),
        change.data_name()
    );
    if !change.pk_names().is_empty() {
        let key: Vec<String> = change
            .pk_names()
            .iter()
            .zip(change.pk_values())
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        line.push_str(&format!(" [{}]", key.join(", ")));
    }
    line.push('\n');

    if let (Some(before), Some(after)) = (change.row_at_start_point(), change.row_at_end_point()) {
        for column in change.modified_columns() {
            line.push_str(&format!(
                "  {}: {} -> {}\n",
                column,
                display_or_missing(before.get(column)),
                display_or_missing(after.get(column)),
            ));
        }
    }
    line
}

fn display_or_missing(value: Option<&Value>) -> String {
    value.map_or_else(|| "<missing>".to_string(), Value::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_changes;
    use crate::model::{DataKind, Snapshot, ValueType};

    fn snapshot(rows: Vec<Vec<Value>>) -> Snapshot {
        Snapshot::builder(DataKind::Table, "users")
            .column("id", ValueType::Integer)
            .column("name", ValueType::Text)
            .primary_key(["id"])
            .rows(rows)
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_modification() {
        let before = snapshot(vec![vec![1.into(), "Ada".into()]]);
        let after = snapshot(vec![
            vec![1.into(), "Grace".into()],
            vec![2.into(), "Alan".into()],
        ]);
        let changes = compute_changes(&before, &after).unwrap();
        let text = render_changes(&changes);
        assert_eq!(
            text,
            "2 change(s): 1 creation(s), 1 modification(s), 0 deletion(s)\n\
             MODIFICATION table users [ID=1]\n  NAME: 'Ada' -> 'Grace'\n\
             CREATION table users [ID=2]\n"
        );
    }
}
