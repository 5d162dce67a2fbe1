//! Order Repository
//!
//! In-memory arena holding every order the OMS has ever created, in
//! creation order. Orders are split into an active and a completed set;
//! an order moves to the completed set exactly once, the first time it
//! reaches a terminal status, and is never removed.
//!
//! The repository is not synchronized. It is owned by a single task and
//! mutated only through [`OrderRepository::update`].

use std::collections::{HashMap, HashSet};

use super::aggregate::MultiLegOrder;
use super::errors::OrderError;
use crate::domain::shared::OrderId;

/// Arena of multi-leg orders keyed by [`OrderId`].
#[derive(Debug, Default)]
pub struct OrderRepository {
    orders: Vec<MultiLegOrder>,
    index: HashMap<OrderId, usize>,
    active: HashSet<OrderId>,
    completed: HashSet<OrderId>,
}

impl OrderRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a repository from stored orders. Non-terminal orders go back
    /// to the active set.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateOrderId` if two stored orders share an id.
    pub fn restore(orders: Vec<MultiLegOrder>) -> Result<Self, OrderError> {
        let mut repo = Self::new();
        for order in orders {
            repo.insert(order)?;
        }
        Ok(repo)
    }

    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateOrderId` if the id is already present.
    pub fn insert(&mut self, order: MultiLegOrder) -> Result<(), OrderError> {
        let id = order.order_id().clone();
        if self.index.contains_key(&id) {
            return Err(OrderError::DuplicateOrderId {
                order_id: id.into_inner(),
            });
        }

        if order.status().is_terminal() {
            self.completed.insert(id.clone());
        } else {
            self.active.insert(id.clone());
        }
        self.index.insert(id, self.orders.len());
        self.orders.push(order);
        Ok(())
    }

    /// Get an order by id.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&MultiLegOrder> {
        self.index.get(id).map(|&slot| &self.orders[slot])
    }

    /// Apply a mutation to an order.
    ///
    /// The closure runs against a copy; the copy replaces the stored order
    /// only if the closure succeeds, so a failed transition leaves the
    /// repository untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or the closure's error.
    pub fn update<F>(&mut self, id: &OrderId, mutate: F) -> Result<&MultiLegOrder, OrderError>
    where
        F: FnOnce(&mut MultiLegOrder) -> Result<(), OrderError>,
    {
        let slot = *self.index.get(id).ok_or_else(|| OrderError::NotFound {
            order_id: id.to_string(),
        })?;

        let mut draft = self.orders[slot].clone();
        mutate(&mut draft)?;

        if draft.status().is_terminal() && self.active.remove(id) {
            self.completed.insert(id.clone());
        }
        self.orders[slot] = draft;
        Ok(&self.orders[slot])
    }

    /// All orders in creation order.
    #[must_use]
    pub fn orders(&self) -> &[MultiLegOrder] {
        &self.orders
    }

    /// Active orders in creation order.
    pub fn active(&self) -> impl Iterator<Item = &MultiLegOrder> {
        self.orders
            .iter()
            .filter(|order| self.active.contains(order.order_id()))
    }

    /// Number of orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns true if no orders have been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of active orders.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of completed orders.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Returns true if the order is in the completed set.
    #[must_use]
    pub fn is_completed(&self, id: &OrderId) -> bool {
        self.completed.contains(id)
    }
}
