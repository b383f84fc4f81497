use smallvec::SmallVec;
use std::collections::HashMap;

/// Element opened for a list item that was never explicitly started.
pub const IMPLICIT_ITEM: &str = "text:list-header";
const ITEM: &str = "text:list-item";

/// One open list level.
#[derive(Debug, Clone)]
pub struct ListLevel {
    pub ordered: bool,
    /// Index of the list style in the style registry
    pub style: usize,
    /// Item element currently open at this level
    pub item: Option<&'static str>,
    /// Label forced on the next item
    pending_start: Option<i64>,
}

/// What the generator writes when a list item opens.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOpen {
    /// End tag of the previous item of the level, if still open
    pub close_previous: Option<&'static str>,
    /// `text:start-value` of the new item
    pub start_value: Option<i64>,
    /// 1-based level
    pub level: u32,
    pub style: usize,
}

type Labels = SmallVec<[i64; 8]>;

/// Tracks open list levels and the last label rendered at each level.
///
/// Labels of identified lists survive the close of the outermost level, so
/// re-opening the same id continues the numbering. An explicit
/// `text:start-value` overrides the continuation.
#[derive(Debug, Default, Clone)]
pub struct ListManager {
    levels: SmallVec<[ListLevel; 8]>,
    list_id: Option<i64>,
    anonymous: Labels,
    by_id: HashMap<i64, Labels>,
}

impl ListManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open levels.
    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Id of the outermost open list.
    #[inline]
    pub fn list_id(&self) -> Option<i64> {
        self.list_id
    }

    /// Innermost open level.
    #[inline]
    pub fn current(&self) -> Option<&ListLevel> {
        self.levels.last()
    }

    fn labels(&mut self) -> &mut Labels {
        match self.list_id {
            Some(id) => self.by_id.entry(id).or_default(),
            None => &mut self.anonymous,
        }
    }

    fn last_label(&mut self, level: usize) -> i64 {
        self.labels().get(level - 1).copied().unwrap_or(0)
    }

    /// Push a level. `id` only matters for the outermost level.
    pub fn open_level(&mut self, id: Option<i64>, ordered: bool, style: usize, start_value: Option<i64>) {
        if self.levels.is_empty() {
            self.list_id = id;
            if id.is_none() {
                self.anonymous.clear();
            }
        }
        let level = self.levels.len() + 1;
        let pending_start = match start_value {
            Some(start) => Some(start),
            None if self.list_id.is_some() => {
                let last = self.last_label(level);
                (last > 0).then_some(last + 1)
            },
            None => None,
        };
        self.levels.push(ListLevel {
            ordered,
            style,
            item: None,
            pending_start,
        });
    }

    /// Open an item at the innermost level.
    pub fn open_item(&mut self) -> Option<ItemOpen> {
        let depth = self.levels.len();
        let top = self.levels.last_mut()?;
        let close_previous = top.item.replace(ITEM);
        let forced = top.pending_start.take();
        let (ordered, style) = (top.ordered, top.style);

        let last = self.last_label(depth);
        let label = forced.unwrap_or(last + 1);
        let labels = self.labels();
        labels.resize(depth.max(labels.len()), 0);
        labels[depth - 1] = label;
        labels.truncate(depth);

        Some(ItemOpen {
            close_previous,
            start_value: forced.filter(|_| ordered),
            level: depth as u32,
            style,
        })
    }

    /// Make sure the innermost level has an open item before a nested level
    /// opens; returns the element to open if one was missing.
    pub fn ensure_item(&mut self) -> Option<&'static str> {
        let top = self.levels.last_mut()?;
        if top.item.is_some() {
            return None;
        }
        top.item = Some(IMPLICIT_ITEM);
        Some(IMPLICIT_ITEM)
    }

    /// Point open levels using style `from` at style `to`.
    pub fn retarget(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        for level in self.levels.iter_mut().filter(|l| l.style == from) {
            level.style = to;
        }
    }

    /// Pop the innermost level.
    pub fn close_level(&mut self) -> Option<ListLevel> {
        let level = self.levels.pop()?;
        if self.levels.is_empty() {
            self.list_id = None;
        }
        Some(level)
    }

    /// Start an empty list state for a sub-tree (note, frame, cell, ...) and
    /// return the state it replaces. Labels of identified lists carry over.
    pub fn suspend(&mut self) -> ListManager {
        let inner = ListManager {
            by_id: self.by_id.clone(),
            ..ListManager::default()
        };
        std::mem::replace(self, inner)
    }

    /// Restore the state saved by [`suspend`](Self::suspend), keeping the
    /// labels rendered inside the sub-tree.
    pub fn resume(&mut self, mut outer: ListManager) {
        outer.by_id = std::mem::take(&mut self.by_id);
        *self = outer;
    }

    /// Forget every open level, keeping the labels of identified lists.
    pub fn reset(&mut self) {
        self.levels.clear();
        self.list_id = None;
        self.anonymous.clear();
    }
}
