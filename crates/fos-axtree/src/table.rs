//! Tables
//!
//! Lazily computed grid structure of table-like nodes: rows, cell
//! placement with spans, headers and caption. The projection is cached per
//! table and rebuilt after any applied update.

use crate::attributes::IntAttribute;
use crate::node::NodeRef;
use crate::role::Role;
use crate::AxNodeId;
use std::collections::HashMap;
use std::rc::Rc;

/// Placement of one cell in its table's grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCell {
    pub id: AxNodeId,
    pub row_index: usize,
    pub col_index: usize,
    pub row_span: usize,
    pub col_span: usize,
    /// 1-based ARIA indices
    pub aria_row_index: i32,
    pub aria_col_index: i32,
}

/// Grid projection of one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableInfo {
    pub row_count: usize,
    pub col_count: usize,
    pub aria_row_count: Option<i32>,
    pub aria_col_count: Option<i32>,
    pub caption_id: Option<AxNodeId>,
    pub row_ids: Vec<AxNodeId>,
    /// `cell_ids[row][col]`; slots no cell covers hold `INVALID_NODE_ID`
    pub cell_ids: Vec<Vec<AxNodeId>>,
    /// Each cell once, in document order
    pub unique_cell_ids: Vec<AxNodeId>,
    pub cells: HashMap<AxNodeId, TableCell>,
    pub col_headers: Vec<Vec<AxNodeId>>,
    pub row_headers: Vec<Vec<AxNodeId>>,
}

fn find_rows<'a>(node: NodeRef<'a>, rows: &mut Vec<NodeRef<'a>>, caption: &mut Option<AxNodeId>) {
    for child in node.children() {
        let role = child.role();
        if role.is_table_row() {
            rows.push(child);
        } else if role == Role::RowGroup || role.is_generic_container() || child.is_ignored() {
            find_rows(child, rows, caption);
        } else if role == Role::Caption && caption.is_none() {
            *caption = Some(child.id());
        }
    }
}

fn find_cells<'a>(row: NodeRef<'a>, cells: &mut Vec<NodeRef<'a>>) {
    for child in row.children() {
        if child.role().is_cell_or_table_header() {
            cells.push(child);
        } else if child.role().is_generic_container() || child.is_ignored() {
            find_cells(child, cells);
        }
    }
}

fn explicit_index(node: NodeRef<'_>, attr: IntAttribute) -> Option<usize> {
    node.data()
        .int_attribute(attr)
        .and_then(|value| usize::try_from(value).ok())
}

fn span(node: NodeRef<'_>, attr: IntAttribute) -> usize {
    explicit_index(node, attr).unwrap_or(1).max(1)
}

impl TableInfo {
    pub(crate) fn build(table: NodeRef<'_>) -> Self {
        let mut rows = Vec::new();
        let mut caption_id = None;
        find_rows(table, &mut rows, &mut caption_id);

        let mut occupied: Vec<Vec<bool>> = Vec::new();
        let mut placed = Vec::new();
        for (row_position, row) in rows.iter().enumerate() {
            let mut cells = Vec::new();
            find_cells(*row, &mut cells);
            let mut cursor = 0;
            for cell in cells {
                let row_index =
                    explicit_index(cell, IntAttribute::TableCellRowIndex).unwrap_or(row_position);
                let row_span = span(cell, IntAttribute::TableCellRowSpan);
                let col_span = span(cell, IntAttribute::TableCellColumnSpan);
                let col_index = match explicit_index(cell, IntAttribute::TableCellColumnIndex) {
                    Some(col) => col,
                    None => {
                        while occupied
                            .get(row_index)
                            .and_then(|slots| slots.get(cursor))
                            .copied()
                            .unwrap_or(false)
                        {
                            cursor += 1;
                        }
                        cursor
                    }
                };
                cursor = col_index + col_span;

                for r in row_index..row_index + row_span {
                    if occupied.len() <= r {
                        occupied.resize(r + 1, Vec::new());
                    }
                    let slots = &mut occupied[r];
                    if slots.len() < col_index + col_span {
                        slots.resize(col_index + col_span, false);
                    }
                    for slot in &mut slots[col_index..col_index + col_span] {
                        *slot = true;
                    }
                }

                let data = cell.data();
                placed.push(TableCell {
                    id: cell.id(),
                    row_index,
                    col_index,
                    row_span,
                    col_span,
                    aria_row_index: data
                        .int_attribute(IntAttribute::AriaCellRowIndex)
                        .unwrap_or(row_index as i32 + 1),
                    aria_col_index: data
                        .int_attribute(IntAttribute::AriaCellColumnIndex)
                        .unwrap_or(col_index as i32 + 1),
                });
            }
        }

        let row_count = placed
            .iter()
            .map(|cell| cell.row_index + cell.row_span)
            .max()
            .unwrap_or(0)
            .max(rows.len());
        let col_count = placed
            .iter()
            .map(|cell| cell.col_index + cell.col_span)
            .max()
            .unwrap_or(0);

        let mut info = TableInfo {
            row_count,
            col_count,
            aria_row_count: table.data().int_attribute(IntAttribute::AriaRowCount),
            aria_col_count: table.data().int_attribute(IntAttribute::AriaColumnCount),
            caption_id,
            row_ids: rows.iter().map(|row| row.id()).collect(),
            cell_ids: vec![vec![crate::INVALID_NODE_ID; col_count]; row_count],
            unique_cell_ids: Vec::with_capacity(placed.len()),
            cells: HashMap::with_capacity(placed.len()),
            col_headers: vec![Vec::new(); col_count],
            row_headers: vec![Vec::new(); row_count],
        };

        for cell in placed {
            let role = table.tree().get(cell.id).map(|node| node.role());
            for r in cell.row_index..cell.row_index + cell.row_span {
                for c in cell.col_index..cell.col_index + cell.col_span {
                    if info.cell_ids[r][c] == crate::INVALID_NODE_ID {
                        info.cell_ids[r][c] = cell.id;
                    }
                }
                if role == Some(Role::RowHeader) {
                    info.row_headers[r].push(cell.id);
                }
            }
            if role == Some(Role::ColumnHeader) {
                for c in cell.col_index..cell.col_index + cell.col_span {
                    info.col_headers[c].push(cell.id);
                }
            }
            info.unique_cell_ids.push(cell.id);
            info.cells.insert(cell.id, cell);
        }

        tracing::trace!(
            "Built table {}: {} rows, {} columns",
            table.id(),
            info.row_count,
            info.col_count
        );
        info
    }

    /// Id of the cell covering a slot
    pub fn cell_id(&self, row: usize, col: usize) -> Option<AxNodeId> {
        self.cell_ids
            .get(row)?
            .get(col)
            .copied()
            .filter(|id| *id != crate::INVALID_NODE_ID)
    }
}

impl<'a> NodeRef<'a> {
    pub fn is_table(&self) -> bool {
        self.role().is_table_like()
    }

    pub fn is_table_row(&self) -> bool {
        self.role().is_table_row()
    }

    pub fn is_table_cell_or_header(&self) -> bool {
        self.role().is_cell_or_table_header()
    }

    /// Grid projection; `None` for non-tables and while an update is in
    /// progress
    pub fn table_info(&self) -> Option<Rc<TableInfo>> {
        if !self.is_table() || self.tree().is_update_in_progress() {
            return None;
        }
        let tree = self.tree();
        let generation = tree.generation();
        let mut cache = tree.table_cache.borrow_mut();
        let info = cache
            .refresh(generation)
            .entry(self.id())
            .or_insert_with(|| Rc::new(TableInfo::build(*self)));
        Some(Rc::clone(info))
    }

    /// Nearest table-like ancestor
    pub fn table(&self) -> Option<NodeRef<'a>> {
        self.ancestors().find(|node| node.is_table())
    }

    pub fn table_row_count(&self) -> Option<usize> {
        self.table_info().map(|info| info.row_count)
    }

    pub fn table_col_count(&self) -> Option<usize> {
        self.table_info().map(|info| info.col_count)
    }

    pub fn table_aria_row_count(&self) -> Option<i32> {
        self.table_info()?.aria_row_count
    }

    pub fn table_aria_col_count(&self) -> Option<i32> {
        self.table_info()?.aria_col_count
    }

    pub fn table_cell_count(&self) -> Option<usize> {
        self.table_info().map(|info| info.unique_cell_ids.len())
    }

    pub fn table_cell_from_coords(&self, row: usize, col: usize) -> Option<NodeRef<'a>> {
        let id = self.table_info()?.cell_id(row, col)?;
        self.tree().get(id)
    }

    pub fn table_cell_from_index(&self, index: usize) -> Option<NodeRef<'a>> {
        let id = *self.table_info()?.unique_cell_ids.get(index)?;
        self.tree().get(id)
    }

    pub fn table_caption(&self) -> Option<NodeRef<'a>> {
        let id = self.table_info()?.caption_id?;
        self.tree().get(id)
    }

    pub fn table_col_header_node_ids(&self, col: usize) -> Vec<AxNodeId> {
        self.table_info()
            .and_then(|info| info.col_headers.get(col).cloned())
            .unwrap_or_default()
    }

    pub fn table_row_header_node_ids(&self, row: usize) -> Vec<AxNodeId> {
        self.table_info()
            .and_then(|info| info.row_headers.get(row).cloned())
            .unwrap_or_default()
    }

    /// Every column header, column by column
    pub fn table_unique_col_header_node_ids(&self) -> Vec<AxNodeId> {
        let mut ids = Vec::new();
        if let Some(info) = self.table_info() {
            for id in info.col_headers.iter().flatten() {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        ids
    }

    // Rows

    /// Position of a row among its table's rows
    pub fn table_row_index(&self) -> Option<usize> {
        if !self.is_table_row() {
            return None;
        }
        let info = self.table()?.table_info()?;
        info.row_ids.iter().position(|id| *id == self.id())
    }

    // Cells

    fn cell_placement(&self) -> Option<(Rc<TableInfo>, TableCell)> {
        if !self.is_table_cell_or_header() {
            return None;
        }
        let info = self.table()?.table_info()?;
        let cell = *info.cells.get(&self.id())?;
        Some((info, cell))
    }

    pub fn table_cell_index(&self) -> Option<usize> {
        let (info, cell) = self.cell_placement()?;
        info.unique_cell_ids.iter().position(|id| *id == cell.id)
    }

    pub fn table_cell_row_index(&self) -> Option<usize> {
        self.cell_placement().map(|(_, cell)| cell.row_index)
    }

    pub fn table_cell_col_index(&self) -> Option<usize> {
        self.cell_placement().map(|(_, cell)| cell.col_index)
    }

    pub fn table_cell_row_span(&self) -> Option<usize> {
        self.cell_placement().map(|(_, cell)| cell.row_span)
    }

    pub fn table_cell_col_span(&self) -> Option<usize> {
        self.cell_placement().map(|(_, cell)| cell.col_span)
    }

    pub fn table_cell_aria_row_index(&self) -> Option<i32> {
        self.cell_placement().map(|(_, cell)| cell.aria_row_index)
    }

    pub fn table_cell_aria_col_index(&self) -> Option<i32> {
        self.cell_placement().map(|(_, cell)| cell.aria_col_index)
    }

    /// Column headers of the columns this cell spans, excluding itself
    pub fn table_cell_col_header_node_ids(&self) -> Vec<AxNodeId> {
        let Some((info, cell)) = self.cell_placement() else {
            return Vec::new();
        };
        let mut ids = Vec::new();
        for col in cell.col_index..cell.col_index + cell.col_span {
            for id in info.col_headers.get(col).into_iter().flatten() {
                if *id != cell.id && !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        ids
    }

    /// Row headers of the rows this cell spans, excluding itself
    pub fn table_cell_row_header_node_ids(&self) -> Vec<AxNodeId> {
        let Some((info, cell)) = self.cell_placement() else {
            return Vec::new();
        };
        let mut ids = Vec::new();
        for row in cell.row_index..cell.row_index + cell.row_span {
            for id in info.row_headers.get(row).into_iter().flatten() {
                if *id != cell.id && !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        ids
    }

    pub fn is_cell_or_header_of_aria_table(&self) -> bool {
        self.is_table_cell_or_header() && self.table().is_some_and(|table| table.role() == Role::Table)
    }

    pub fn is_cell_or_header_of_aria_grid(&self) -> bool {
        self.is_table_cell_or_header()
            && self
                .table()
                .is_some_and(|table| matches!(table.role(), Role::Grid | Role::TreeGrid))
    }
}
