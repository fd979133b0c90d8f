//! Keyed list whose cells seed their own containers from an item.
//!
//! Each row is a cell scope keyed by the item id. The cell builds its model
//! owned-once from the item it first sees, so:
//!
//! - moving items keeps every cell attached to its item (same key);
//! - changing an item in place (see [`CatalogDemo::randomize`]) leaves the
//!   cell showing the old data, because its model is never rebuilt.
//!
//! The debug overlay prints the live item next to each cell to make the
//! divergence visible.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::demos::{DemoError, Frame};
use crate::load::{LoadPhase, Loader};
use crate::scope::{ScopeKey, ScopeRegistry};
use crate::state::{ObservableState, StateError};

/// Price marking the item that [`CatalogDemo::randomize`] retitles.
pub const SENTINEL_PRICE: u32 = 99_999;

const VIEW_MODEL_SLOT: &str = "view_model";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub price: u32,
    pub symbol: String,
}

impl Item {
    pub fn new(title: impl Into<String>, price: u32, symbol: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price,
            symbol: symbol.into(),
        }
    }

    /// Stable identity used to key cells.
    pub fn id(&self) -> &str {
        &self.symbol
    }
}

/// Sample catalog: five fixed items plus the sentinel with a random title.
pub fn mock_items() -> Vec<Item> {
    vec![
        Item::new("Mouse", 40, "computermouse"),
        Item::new("Keyboard", 200, "keyboard"),
        Item::new("Dice", 4, "dice"),
        Item::new("Puzzle Cube", 10, "cube"),
        Item::new("Vision Pro", 3500, "dollarsign.circle"),
        Item::new(random_title(), SENTINEL_PRICE, "infinity.circle"),
    ]
}

fn random_title() -> String {
    Uuid::new_v4().to_string().to_uppercase()[..8].to_string()
}

/// Move the elements at `offsets` so they land before `destination`,
/// keeping their relative order. `destination` counts positions in the
/// list before removal.
fn move_offsets<T>(items: &mut Vec<T>, offsets: &[usize], destination: usize) {
    let mut offsets = offsets.to_vec();
    offsets.sort_unstable();
    offsets.dedup();

    let insert_at = destination - offsets.iter().filter(|&&i| i < destination).count();
    let mut moved: Vec<T> = offsets.iter().rev().map(|&i| items.remove(i)).collect();
    moved.reverse();
    let tail = items.split_off(insert_at);
    items.extend(moved);
    items.extend(tail);
}

fn cell_model(item: &Item) -> ObservableState {
    let state = ObservableState::builder()
        .label("catalog.cell")
        .field("title", item.title.as_str())
        .field("symbol", item.symbol.as_str())
        .field("price", i64::from(item.price))
        .build();
    tracing::debug!(state = %state.id(), item = item.id(), "Cell model seeded");
    state
}

fn cell_row(cell: &ObservableState) -> Result<String, StateError> {
    let title: String = cell.get_as("title")?;
    let symbol: String = cell.get_as("symbol")?;
    let price: i64 = cell.get_as("price")?;
    Ok(format!("{} [{}] ${}", title, symbol, price))
}

pub struct CatalogDemo {
    registry: ScopeRegistry,
    root: ScopeKey,
    cells: ScopeKey,
    model: ObservableState,
    loader: Loader,
    fixture: Vec<Item>,
    debug: bool,
}

impl CatalogDemo {
    /// `fixture` is what [`CatalogDemo::load_items`] delivers after `delay`.
    pub fn new(
        registry: ScopeRegistry,
        fixture: Vec<Item>,
        delay: Duration,
    ) -> Result<Self, DemoError> {
        let root = ScopeKey::new("catalog");
        let cells = root.child("cells");

        let scope = registry.activate(root.clone());
        let seed = ObservableState::builder()
            .label("catalog.view_model")
            .field_as("items", &Vec::<Item>::new())?
            .field_as("phase", &LoadPhase::NotLoaded)?;
        let model = scope
            .bind_owned_once(VIEW_MODEL_SLOT, move || seed.build())
            .into_state();
        let loader = Loader::new(model.clone(), "phase", delay)?;

        Ok(Self {
            registry,
            root,
            cells,
            model,
            loader,
            fixture,
            debug: false,
        })
    }

    pub fn model(&self) -> &ObservableState {
        &self.model
    }

    pub fn items(&self) -> Result<Vec<Item>, DemoError> {
        Ok(self.model.get_as("items")?)
    }

    pub fn phase(&self) -> Result<LoadPhase, DemoError> {
        Ok(self.loader.phase()?)
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Wait for the configured delay, then publish the fixture.
    pub async fn load_items(&self) -> Result<(), DemoError> {
        let model = self.model.clone();
        let items = self.fixture.clone();
        self.loader
            .load_with(async move { model.set_as("items", &items) })
            .await?;
        tracing::info!(count = self.fixture.len(), "Catalog loaded");
        Ok(())
    }

    /// Move the items at `from_offsets` to `to_offset`, as a drag-and-drop
    /// reorder would.
    pub fn move_items(&self, from_offsets: &[usize], to_offset: usize) -> Result<(), DemoError> {
        let mut items = self.items()?;
        let len = items.len();
        if let Some(&offset) = from_offsets.iter().find(|&&i| i >= len) {
            return Err(DemoError::OffsetOutOfRange { offset, len });
        }
        if to_offset > len {
            return Err(DemoError::OffsetOutOfRange {
                offset: to_offset,
                len,
            });
        }

        move_offsets(&mut items, from_offsets, to_offset);
        self.model.set_as("items", &items)?;
        Ok(())
    }

    /// Give the sentinel item a new random title.
    ///
    /// Returns false if there is no sentinel in the list.
    pub fn randomize(&self) -> Result<bool, DemoError> {
        let mut items = self.items()?;
        let Some(item) = items.iter_mut().find(|item| item.price == SENTINEL_PRICE) else {
            return Ok(false);
        };
        item.title = random_title();
        tracing::debug!(item = item.id(), title = %item.title, "Sentinel retitled");
        self.model.set_as("items", &items)?;
        Ok(true)
    }

    /// The model a cell built for the item with `id`, if that cell is live.
    pub fn cell(&self, id: &str) -> Option<ObservableState> {
        self.registry
            .get(&self.cells.child(id))
            .and_then(|scope| scope.owned(VIEW_MODEL_SLOT))
    }

    /// Render the list, activating one cell scope per item and tearing
    /// down cells whose items are gone.
    pub fn render(&self) -> Result<Frame, DemoError> {
        self.registry.activate(self.root.clone());
        let items = self.items()?;
        let mut frame = Frame::new();

        if items.is_empty() && self.phase()?.is_loading() {
            frame.push("Loading...");
        }

        let mut live = Vec::with_capacity(items.len());
        for item in &items {
            let key = self.cells.child(item.id());
            let scope = self.registry.activate(key.clone());
            live.push(key);

            let binding = scope.bind_owned_once(VIEW_MODEL_SLOT, || cell_model(item));
            let mut row = cell_row(binding.state())?;
            if self.debug {
                row.push_str(&format!("  | {} ${}", item.title, item.price));
            }
            frame.push(row);
        }

        self.registry.retain_children(&self.cells, &live);
        Ok(frame)
    }
}

impl Drop for CatalogDemo {
    fn drop(&mut self) {
        self.registry.teardown(&self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Vec<char> {
        vec!['a', 'b', 'c', 'd', 'e']
    }

    #[test]
    fn test_move_single_down() {
        let mut items = letters();
        move_offsets(&mut items, &[0], 3);
        assert_eq!(items, vec!['b', 'c', 'a', 'd', 'e']);
    }

    #[test]
    fn test_move_single_up() {
        let mut items = letters();
        move_offsets(&mut items, &[4], 1);
        assert_eq!(items, vec!['a', 'e', 'b', 'c', 'd']);
    }

    #[test]
    fn test_move_many_to_end() {
        let mut items = letters();
        move_offsets(&mut items, &[3, 0], 5);
        assert_eq!(items, vec!['b', 'c', 'e', 'a', 'd']);
    }

    #[test]
    fn test_move_to_own_position_is_noop() {
        let mut items = letters();
        move_offsets(&mut items, &[2], 2);
        assert_eq!(items, letters());
        move_offsets(&mut items, &[2], 3);
        assert_eq!(items, letters());
    }

    #[test]
    fn test_mock_items_have_one_sentinel() {
        let items = mock_items();
        assert_eq!(items.len(), 6);
        let sentinels: Vec<_> = items.iter().filter(|i| i.price == SENTINEL_PRICE).collect();
        assert_eq!(sentinels.len(), 1);
        assert_eq!(sentinels[0].title.len(), 8);
    }
}
