use crate::dashboard::geometry::{cell_to_row_col, row_col_to_cell, CellIndex, CellRect, Span};
use crate::dashboard::instances::InstanceId;
use std::collections::BTreeMap;

/// A widget instance anchored at an origin cell with its span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub origin: CellIndex,
    pub instance: InstanceId,
    pub span: Span,
}

impl Placement {
    pub fn rect(&self, cols: usize) -> CellRect {
        CellRect::at(self.origin, self.span, cols)
    }
}

/// Placement table and span table, both keyed by origin cell.
///
/// Read access is public; only the layout engine mutates it, and it keeps
/// both tables on the same key set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    placements: BTreeMap<CellIndex, InstanceId>,
    spans: BTreeMap<CellIndex, Span>,
}

impl Occupancy {
    /// Placement whose origin is exactly `cell`.
    pub fn placement_at(&self, cell: CellIndex) -> Option<Placement> {
        let instance = self.placements.get(&cell)?;
        Some(Placement {
            origin: cell,
            instance: instance.clone(),
            span: self.span_at(cell),
        })
    }

    /// Span stored for `cell`, or 1x1 when nothing is anchored there.
    pub fn span_at(&self, cell: CellIndex) -> Span {
        self.spans.get(&cell).copied().unwrap_or_default()
    }

    pub fn has_span(&self, cell: CellIndex) -> bool {
        self.spans.contains_key(&cell)
    }

    /// Placement whose rectangle covers `cell`, whether or not it is the origin.
    pub fn owner_of(&self, cell: CellIndex, cols: usize) -> Option<Placement> {
        if let Some(p) = self.placement_at(cell) {
            return Some(p);
        }
        let (row, col) = cell_to_row_col(cell, cols);
        self.placements().find(|p| p.rect(cols).contains(row, col))
    }

    pub fn origin_of(&self, id: &InstanceId) -> Option<CellIndex> {
        self.placements
            .iter()
            .find_map(|(cell, inst)| (inst == id).then_some(*cell))
    }

    pub fn is_free(&self, rect: &CellRect, cols: usize, excluding: Option<&InstanceId>) -> bool {
        self.first_conflict(rect, cols, excluding).is_none()
    }

    /// First cell of `rect` (row-major) covered by a placement other than
    /// `excluding`.
    pub fn first_conflict(
        &self,
        rect: &CellRect,
        cols: usize,
        excluding: Option<&InstanceId>,
    ) -> Option<CellIndex> {
        // The first covered cell of each overlap is its top-left corner.
        self.placements()
            .filter(|p| Some(&p.instance) != excluding)
            .map(|p| p.rect(cols))
            .filter(|other| other.intersects(rect))
            .map(|other| (rect.row.max(other.row), rect.col.max(other.col)))
            .min()
            .map(|(r, c)| row_col_to_cell(r, c, cols))
    }

    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.placements.iter().map(|(cell, instance)| Placement {
            origin: *cell,
            instance: instance.clone(),
            span: self.span_at(*cell),
        })
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Origins present in the span table.
    pub fn span_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.spans.keys().copied()
    }

    pub(crate) fn insert(&mut self, origin: CellIndex, instance: InstanceId, span: Span) {
        self.placements.insert(origin, instance);
        self.spans.insert(origin, span);
    }

    pub(crate) fn remove(&mut self, origin: CellIndex) -> Option<Placement> {
        let instance = self.placements.remove(&origin)?;
        let span = self.spans.remove(&origin).unwrap_or_default();
        Some(Placement {
            origin,
            instance,
            span,
        })
    }

    pub(crate) fn set_instance(&mut self, origin: CellIndex, instance: InstanceId) {
        if let Some(slot) = self.placements.get_mut(&origin) {
            *slot = instance;
        }
    }

    /// Move the placement at `from` to `to` with `span`, replacing both
    /// table entries in one step.
    pub(crate) fn relocate(&mut self, from: CellIndex, to: CellIndex, span: Span) {
        if let Some(instance) = self.placements.remove(&from) {
            self.spans.remove(&from);
            self.placements.insert(to, instance);
            self.spans.insert(to, span);
        }
    }

    pub(crate) fn replace_all(&mut self, placements: Vec<Placement>) {
        self.placements.clear();
        self.spans.clear();
        for p in placements {
            self.insert(p.origin, p.instance, p.span);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupancy_with(entries: &[(CellIndex, &str, Span)]) -> Occupancy {
        let mut occ = Occupancy::default();
        for (cell, id, span) in entries {
            occ.insert(*cell, InstanceId::new(*id), *span);
        }
        occ
    }

    #[test]
    fn owner_of_finds_covering_placement() {
        let occ = occupancy_with(&[(0, "a", Span::new(2, 2))]);
        assert_eq!(occ.owner_of(6, 5).map(|p| p.origin), Some(0));
        assert!(occ.owner_of(2, 5).is_none());
        assert!(occ.placement_at(6).is_none());
    }

    #[test]
    fn is_free_honours_exclusion() {
        let occ = occupancy_with(&[(0, "a", Span::new(2, 1)), (7, "b", Span::UNIT)]);
        let rect = CellRect::at(1, Span::new(2, 2), 5);
        assert_eq!(occ.first_conflict(&rect, 5, None), Some(1));
        let a = InstanceId::new("a");
        assert_eq!(occ.first_conflict(&rect, 5, Some(&a)), Some(7));
        let b = InstanceId::new("b");
        assert!(!occ.is_free(&rect, 5, Some(&b)));
        let clear = CellRect::at(3, Span::new(2, 1), 5);
        assert!(occ.is_free(&clear, 5, None));
    }

    #[test]
    fn first_conflict_is_row_major_minimum() {
        let occ = occupancy_with(&[(8, "a", Span::UNIT), (2, "b", Span::new(1, 3))]);
        let rect = CellRect::at(0, Span::new(5, 3), 5);
        assert_eq!(occ.first_conflict(&rect, 5, None), Some(2));
        let wide = CellRect::new(1, 0, Span::new(usize::MAX, 1));
        assert_eq!(occ.first_conflict(&wide, 5, None), Some(7));
    }

    #[test]
    fn relocate_moves_both_tables() {
        let mut occ = occupancy_with(&[(2, "a", Span::new(2, 1))]);
        occ.relocate(2, 7, Span::new(2, 1));
        assert!(occ.placement_at(2).is_none());
        assert!(!occ.has_span(2));
        assert_eq!(occ.placement_at(7).unwrap().span, Span::new(2, 1));
        assert_eq!(occ.origin_of(&InstanceId::new("a")), Some(7));
    }

    #[test]
    fn remove_clears_span() {
        let mut occ = occupancy_with(&[(4, "a", Span::new(1, 2))]);
        let removed = occ.remove(4).unwrap();
        assert_eq!(removed.span, Span::new(1, 2));
        assert!(occ.is_empty());
        assert_eq!(occ.span_cells().count(), 0);
        assert!(occ.remove(4).is_none());
    }
}
