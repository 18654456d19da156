//! Position hand-off for tables introduced by a reconciliation.
//!
//! Existing tables never move. A new table that lands on top of another one
//! is moved into rows below everything already on the canvas.

use crate::measure::TextMetrics;
use crate::model::Table;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

pub struct Placement {
    metrics: TextMetrics,
    gap_x: f64,
    gap_y: f64,
    min_row_width: f64,
    margin: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
            gap_x: 80.0,
            gap_y: 80.0,
            min_row_width: 1200.0,
            margin: 40.0,
        }
    }
}

impl Placement {
    /// Move overlapping tables listed in `new_ids`.
    pub fn place(&self, tables: &mut [Table], new_ids: &HashSet<String>) {
        let mut placed: Vec<Rect> = tables
            .iter()
            .filter(|t| !new_ids.contains(&t.id))
            .map(|t| self.rect(t))
            .collect();

        let (origin_x, mut row_y, row_width) = match bounding_box(&placed) {
            Some(b) => (b.x, b.y + b.height + self.gap_y, b.width.max(self.min_row_width)),
            None => (self.margin, self.margin, self.min_row_width),
        };
        let mut cursor_x = origin_x;
        let mut row_height: f64 = 0.0;

        for table in tables.iter_mut().filter(|t| new_ids.contains(&t.id)) {
            let mut rect = self.rect(table);
            if !placed.iter().any(|p| p.overlaps(&rect)) {
                placed.push(rect);
                continue;
            }

            loop {
                if cursor_x > origin_x && cursor_x + rect.width > origin_x + row_width {
                    cursor_x = origin_x;
                    row_y += row_height + self.gap_y;
                    row_height = 0.0;
                }
                rect.x = cursor_x;
                rect.y = row_y;
                cursor_x += rect.width + self.gap_x;
                row_height = row_height.max(rect.height);
                if !placed.iter().any(|p| p.overlaps(&rect)) {
                    break;
                }
            }

            log::debug!("placed new table {} at ({}, {})", table.name, rect.x, rect.y);
            table.x = rect.x;
            table.y = rect.y;
            placed.push(rect);
        }
    }

    fn rect(&self, table: &Table) -> Rect {
        let (width, height) = self.metrics.table_size(table);
        Rect {
            x: table.x,
            y: table.y,
            width,
            height,
        }
    }
}

fn bounding_box(rects: &[Rect]) -> Option<Rect> {
    let first = rects.first()?;
    let (mut min_x, mut min_y) = (first.x, first.y);
    let (mut max_x, mut max_y) = (first.x + first.width, first.y + first.height);
    for r in &rects[1..] {
        min_x = min_x.min(r.x);
        min_y = min_y.min(r.y);
        max_x = max_x.max(r.x + r.width);
        max_y = max_y.max(r.y + r.height);
    }
    Some(Rect {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn at(mut t: Table, x: f64, y: f64) -> Table {
        t.x = x;
        t.y = y;
        t
    }

    #[test]
    fn test_overlapping_new_tables_move_below() {
        let mut tables = vec![
            at(table("A", "users", vec![field("F1", "id", "int")]), 0.0, 0.0),
            at(table("n1", "orders", vec![]), 0.0, 0.0),
            at(table("n2", "items", vec![]), 10.0, 10.0),
        ];
        let new_ids: HashSet<String> = ["n1", "n2"].iter().map(|s| s.to_string()).collect();

        Placement::default().place(&mut tables, &new_ids);

        assert_eq!((tables[0].x, tables[0].y), (0.0, 0.0));
        let (_, existing_height) = TextMetrics::default().table_size(&tables[0]);
        assert!(tables[1].y > existing_height);
        assert_eq!(tables[1].y, tables[2].y);
        assert!(tables[2].x > tables[1].x);
    }

    #[test]
    fn test_free_new_table_keeps_position() {
        let mut tables = vec![
            at(table("A", "users", vec![]), 0.0, 0.0),
            at(table("n1", "orders", vec![]), 2000.0, 0.0),
        ];
        let new_ids: HashSet<String> = ["n1".to_string()].into_iter().collect();

        Placement::default().place(&mut tables, &new_ids);
        assert_eq!((tables[1].x, tables[1].y), (2000.0, 0.0));
    }

    #[test]
    fn test_rows_wrap() {
        let mut tables: Vec<Table> = (0..10)
            .map(|i| table(&format!("n{i}"), &format!("t{i}"), vec![]))
            .collect();
        let new_ids: HashSet<String> = tables.iter().map(|t| t.id.clone()).collect();

        Placement::default().place(&mut tables, &new_ids);

        let rows: HashSet<i64> = tables.iter().map(|t| t.y as i64).collect();
        assert!(rows.len() > 1);
        for (i, a) in tables.iter().enumerate() {
            for b in &tables[i + 1..] {
                assert!(a.x != b.x || a.y != b.y);
            }
        }
    }
}
