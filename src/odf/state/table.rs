use smallvec::SmallVec;

/// Filler written for a grid slot the parser left unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Slot reserved by a spanning cell
    Covered,
    /// Gap before a reserved slot
    Empty,
}

/// Header-row grouping changes required before a row opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStart {
    pub open_header_rows: bool,
    pub close_header_rows: bool,
}

/// Cell grid of one open table.
///
/// A cell spanning `c` columns reserves the `c - 1` following slots of its
/// row; spanning `r` rows reserves its columns in the `r - 1` following rows.
/// Reserved slots the parser does not fill itself become covered cells.
#[derive(Debug, Clone)]
pub struct TableState {
    /// Index of the table style in the style registry
    pub style: usize,
    column_count: usize,
    current_column: usize,
    header_rows_open: bool,
    /// Slots of the current row taken by earlier spanning cells
    reserved: Vec<bool>,
    /// Per column, number of rows below the current one still reserved
    rows_below: Vec<usize>,
}

impl TableState {
    pub fn new(style: usize, declared_columns: usize) -> Self {
        Self {
            style,
            column_count: declared_columns,
            current_column: 0,
            header_rows_open: false,
            reserved: Vec::new(),
            rows_below: Vec::new(),
        }
    }

    /// Widest row seen so far, or the declared column count.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Start a row.
    pub fn open_row(&mut self, header: bool) -> RowStart {
        let start = RowStart {
            open_header_rows: header && !self.header_rows_open,
            close_header_rows: !header && self.header_rows_open,
        };
        self.header_rows_open = header;

        self.current_column = 0;
        self.reserved = self.rows_below.iter().map(|&n| n > 0).collect();
        for remaining in &mut self.rows_below {
            *remaining = remaining.saturating_sub(1);
        }
        start
    }

    /// Number of reserved slots at the cursor; they are consumed.
    pub fn take_reserved(&mut self) -> usize {
        let mut count = 0;
        while self.reserved.get(self.current_column).copied().unwrap_or(false) {
            self.current_column += 1;
            count += 1;
        }
        count
    }

    /// Place a cell at the cursor.
    pub fn place_cell(&mut self, column_span: usize, row_span: usize) {
        let column_span = column_span.max(1);
        let start = self.current_column;
        let end = start + column_span;
        if self.reserved.len() < end {
            self.reserved.resize(end, false);
        }
        if self.rows_below.len() < end {
            self.rows_below.resize(end, 0);
        }
        for column in start..end {
            if column > start {
                self.reserved[column] = true;
            }
            self.rows_below[column] = self.rows_below[column].max(row_span.saturating_sub(1));
        }
        self.current_column += 1;
    }

    /// Place a covered cell at the cursor, whether or not the slot was reserved.
    pub fn place_covered(&mut self) {
        self.current_column += 1;
    }

    /// End the row; returns the fillers needed to complete it.
    pub fn close_row(&mut self) -> SmallVec<[Slot; 4]> {
        let mut fill = SmallVec::new();
        if let Some(last) = self.reserved.iter().rposition(|&r| r) {
            while self.current_column <= last {
                fill.push(if self.reserved[self.current_column] {
                    Slot::Covered
                } else {
                    Slot::Empty
                });
                self.current_column += 1;
            }
        }
        self.column_count = self.column_count.max(self.current_column);
        self.reserved.clear();
        fill
    }

    /// End the table; returns whether a header row group is still open.
    pub fn close(&mut self) -> bool {
        std::mem::take(&mut self.header_rows_open)
    }
}
