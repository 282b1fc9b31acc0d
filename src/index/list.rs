/// Singly-linked list with head insertion.
///
/// Iteration yields elements most-recently-pushed first. Nothing built on top
/// of this list may treat that order as meaningful beyond "reverse insertion".
pub struct LinkedStack<T> {
    head: Option<Box<Link<T>>>,
    len: usize,
}

struct Link<T> {
    value: T,
    next: Option<Box<Link<T>>>,
}

impl<T> LinkedStack<T> {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Pushes `value` in front of the current head. O(1).
    pub fn push_front(&mut self, value: T) {
        let next = self.head.take();
        self.head = Some(Box::new(Link { value, next }));
        self.len += 1;
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Borrowing iterator, head first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Mutable iterator, head first.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            next: self.head.as_deref_mut(),
        }
    }
}

impl<T: Clone> LinkedStack<T> {
    /// Copies the list into a vector, preserving head-first order.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter().cloned());
        out
    }
}

impl<T> Default for LinkedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LinkedStack<T> {
    fn drop(&mut self) {
        // unlink iteratively; recursive Box drops overflow on long chains
        let mut cur = self.head.take();
        while let Some(mut link) = cur {
            cur = link.next.take();
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LinkedStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a LinkedStack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `&T`, see [`LinkedStack::iter`].
pub struct Iter<'a, T> {
    next: Option<&'a Link<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|link| {
            self.next = link.next.as_deref();
            &link.value
        })
    }
}

/// Iterator over `&mut T`, see [`LinkedStack::iter_mut`].
pub struct IterMut<'a, T> {
    next: Option<&'a mut Link<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|link| {
            self.next = link.next.as_deref_mut();
            &mut link.value
        })
    }
}
