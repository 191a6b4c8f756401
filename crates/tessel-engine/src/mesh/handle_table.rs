/// Slot index plus the generation it was issued for.
///
/// A handle goes stale when its slot is removed; the slot's generation moves
/// on, so a later occupant of the same index is never reachable through it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RawHandle {
    index: u32,
    generation: u32,
}

impl RawHandle {
    /// Never issued by any table.
    pub const INVALID: RawHandle = RawHandle { index: u32::MAX, generation: 0 };

    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl Default for RawHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena of `T` addressed by generation checked handles.
///
/// Freed slots are reused LIFO.
#[derive(Debug)]
pub struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots ever allocated (live plus free).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, value: T) -> RawHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.value.is_none());
            slot.value = Some(value);
            return RawHandle { index, generation: slot.generation };
        }
        let index = self.slots.len() as u32;
        debug_assert!(index != u32::MAX, "handle table exhausted");
        self.slots.push(Slot { generation: 1, value: Some(value) });
        RawHandle { index, generation: 1 }
    }

    /// Removes the value and retires the handle. `None` if it was already stale.
    pub fn remove(&mut self, handle: RawHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = next_generation(slot.generation);
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, handle: RawHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: RawHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    #[inline]
    pub fn contains(&self, handle: RawHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RawHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value
                .as_ref()
                .map(|v| (RawHandle { index: i as u32, generation: s.generation }, v))
        })
    }

    /// Removes every value; all outstanding handles go stale.
    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = next_generation(slot.generation);
                self.free.push(i as u32);
            }
        }
        self.len = 0;
    }
}

/// Zero is reserved for [`RawHandle::INVALID`].
#[inline]
fn next_generation(g: u32) -> u32 {
    match g.wrapping_add(1) {
        0 => 1,
        n => n,
    }
}
