// ============================================================
// CSV ROW GROUPER
// ============================================================
// Group flat CSV rows by question id, preserving first-seen id order
// and within-group row order.

use std::collections::HashMap;

use crate::domain::csv_row::PreOpCsvRow;

/// Ordered groups of rows sharing a question id. Rows with a blank id
/// are filler or malformed lines in the upload and are dropped silently.
pub fn group_rows(rows: &[PreOpCsvRow]) -> Vec<(String, Vec<PreOpCsvRow>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<PreOpCsvRow>> = HashMap::new();

    for row in rows {
        if !row.has_id() {
            continue;
        }
        let id = row.id.trim().to_string();
        if !groups.contains_key(&id) {
            order.push(id.clone());
        }
        groups.entry(id).or_default().push(row.clone());
    }

    order
        .into_iter()
        .map(|id| {
            let group = groups.remove(&id).unwrap_or_default();
            (id, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, option: &str) -> PreOpCsvRow {
        PreOpCsvRow {
            id: id.to_string(),
            option: option.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_preserve_first_seen_order() {
        let rows = vec![row("b", "1"), row("a", "1"), row("b", "2"), row("a", "2")];
        let groups = group_rows(&rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b");
        assert_eq!(groups[1].0, "a");
        assert_eq!(groups[0].1[0].option, "1");
        assert_eq!(groups[0].1[1].option, "2");
    }

    #[test]
    fn test_blank_ids_dropped_silently() {
        let rows = vec![row("", "x"), row("   ", "y"), row("q1", "z")];
        let groups = group_rows(&rows);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "q1");
        assert_eq!(groups[0].1.len(), 1);
    }

    #[test]
    fn test_id_trimmed_for_grouping() {
        let rows = vec![row(" q1 ", "a"), row("q1", "b")];
        let groups = group_rows(&rows);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 2);
    }
}
