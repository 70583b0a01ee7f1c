pub trait IdGenerator {
    type Id;

    /// Acquires a new id, `None` when the generator has run dry
    fn acquire(&mut self) -> Option<Self::Id>;

    /// Releases the specified Id
    fn release(&mut self, id: Self::Id);

    /// Returns the number of Ids allocated
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait IdArena: IdGenerator {
    /// Returns the maximum capacity of the arena
    fn capacity(&self) -> usize;

    /// Returns the number of ids that can still be acquired
    fn available(&self) -> usize {
        self.capacity() - self.len()
    }
}

/// Hands out the ids `0..capacity`. Released ids are recycled before fresh ones are minted, so
/// the ids in use stay densely packed at the front of the range.
#[derive(Debug, Clone)]
pub struct SimpleIdArena {
    counter: usize,
    free: Vec<usize>,
    capacity: usize,
}

impl SimpleIdArena {
    pub fn with_capacity(capacity: usize) -> SimpleIdArena {
        SimpleIdArena {
            counter: 0,
            free: Vec::new(),
            capacity,
        }
    }

    /// Returns true if `id` is currently handed out.
    pub fn is_acquired(&self, id: usize) -> bool {
        id < self.counter && !self.free.contains(&id)
    }
}

impl IdGenerator for SimpleIdArena {
    type Id = usize;

    fn acquire(&mut self) -> Option<Self::Id> {
        self.free.pop().or_else(|| {
            if self.counter >= self.capacity {
                None
            } else {
                let id = self.counter;
                self.counter += 1;
                Some(id)
            }
        })
    }

    fn release(&mut self, id: Self::Id) {
        debug_assert!(self.is_acquired(id), "id {} released twice", id);
        self.free.push(id);
    }

    fn len(&self) -> usize {
        self.counter - self.free.len()
    }
}

impl IdArena for SimpleIdArena {
    fn capacity(&self) -> usize {
        self.capacity
    }
}
