//! Loaded PSUs and the current order.
//!
//! [`Warehouse`] is the immutable context every search runs against. It is
//! built once from already-parsed data and never mutated afterwards.

use crate::error::{invalid, Result};
use crate::state::SelectionMask;
use std::collections::{BTreeSet, HashMap};

/// Item identifier as assigned by the loader.
pub type ItemId = u32;

/// A portable storage unit with a fixed set of items.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Psu {
    id: usize,
    items: BTreeSet<ItemId>,
}

impl Psu {
    pub fn new(id: usize, items: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            id,
            items: items.into_iter().collect(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn items(&self) -> &BTreeSet<ItemId> {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Set of items that must be covered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    items: BTreeSet<ItemId>,
}

impl Order {
    pub fn new(items: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn items(&self) -> &BTreeSet<ItemId> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Immutable PSU list plus order.
#[derive(Debug, Clone)]
pub struct Warehouse {
    psus: Vec<Psu>,
    order: Order,
    /// For each PSU, the positions (in `order` iteration order) of the
    /// order items it carries.
    order_hits: Vec<Vec<usize>>,
}

impl Warehouse {
    /// Builds the context. PSU identifiers are reassigned to their index.
    pub fn new(psus: Vec<Psu>, order: Order) -> Self {
        let position: HashMap<ItemId, usize> = order
            .items
            .iter()
            .enumerate()
            .map(|(pos, &item)| (item, pos))
            .collect();

        let psus: Vec<Psu> = psus
            .into_iter()
            .enumerate()
            .map(|(id, psu)| Psu { id, ..psu })
            .collect();

        let order_hits = psus
            .iter()
            .map(|psu| {
                psu.items
                    .iter()
                    .filter_map(|item| position.get(item).copied())
                    .collect()
            })
            .collect();

        Self {
            psus,
            order,
            order_hits,
        }
    }

    /// Builds the context from plain item lists, one list per PSU.
    pub fn from_item_lists(psus: Vec<Vec<ItemId>>, order: Vec<ItemId>) -> Self {
        let psus = psus
            .into_iter()
            .enumerate()
            .map(|(id, items)| Psu::new(id, items))
            .collect();
        Self::new(psus, Order::new(order))
    }

    pub fn psu_count(&self) -> usize {
        self.psus.len()
    }

    pub fn psus(&self) -> &[Psu] {
        &self.psus
    }

    /// PSU at `index`.
    ///
    /// # Errors
    /// [`InvalidInput`](crate::SearchError::InvalidInput) when out of range.
    pub fn psu(&self, index: usize) -> Result<&Psu> {
        match self.psus.get(index) {
            Some(psu) => Ok(psu),
            None => invalid(format!(
                "psu index {index} out of range for {} psus",
                self.psus.len()
            )),
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub(crate) fn order_hits(&self, index: usize) -> &[usize] {
        &self.order_hits[index]
    }

    /// Checks that `mask` has one position per loaded PSU.
    pub fn check_mask(&self, mask: &SelectionMask) -> Result<()> {
        if mask.len() != self.psus.len() {
            return invalid(format!(
                "mask length {} does not match psu count {}",
                mask.len(),
                self.psus.len()
            ));
        }
        Ok(())
    }

    /// PSUs selected by `mask`, in index order.
    pub fn selected_psus<'a, 'm>(
        &'a self,
        mask: &'m SelectionMask,
    ) -> impl Iterator<Item = &'a Psu> + 'm
    where
        'a: 'm,
    {
        mask.selected().filter_map(|i| self.psus.get(i))
    }

    /// Union of the items carried by the selected PSUs.
    pub fn masked_items(&self, mask: &SelectionMask) -> BTreeSet<ItemId> {
        self.selected_psus(mask)
            .flat_map(|psu| psu.items.iter().copied())
            .collect()
    }

    /// Total items carried by the selected PSUs, duplicates across PSUs
    /// counted once per PSU.
    pub fn items_carried(&self, mask: &SelectionMask) -> usize {
        self.selected_psus(mask).map(Psu::item_count).sum()
    }

    /// Number of distinct items carried by the selected PSUs.
    pub fn distinct_item_count(&self, mask: &SelectionMask) -> usize {
        self.masked_items(mask).len()
    }
}
