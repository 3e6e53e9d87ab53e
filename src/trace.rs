use std::collections::VecDeque;

use crate::Point;
use crate::surface::{MarkerId, TraceId};

/// Bounded trailing trace of one tracked object.
///
/// Holds the last `capacity` appended points, oldest first. The surface
/// primitive behind `handle` receives every append; this buffer is the
/// engine's own copy of the window contents.
#[derive(Debug)]
pub struct Trace {
    handle: TraceId,
    capacity: usize,
    points: VecDeque<Point>,
}

impl Trace {
    pub fn new(handle: TraceId, capacity: usize) -> Self {
        Self {
            handle,
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    pub fn handle(&self) -> TraceId {
        self.handle
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends a point, evicting the oldest one beyond capacity.
    pub fn append(&mut self, point: Point) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Points oldest-first.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&Point> {
        self.points.back()
    }
}

/// Snapshot marker at one object's most recent position.
///
/// Overwritten on every step; unrelated to the trace capacity.
#[derive(Debug)]
pub struct HeadMarker {
    handle: MarkerId,
    position: Option<Point>,
}

impl HeadMarker {
    pub fn new(handle: MarkerId) -> Self {
        Self {
            handle,
            position: None,
        }
    }

    pub fn handle(&self) -> MarkerId {
        self.handle
    }

    pub fn set_position(&mut self, point: Point) {
        self.position = Some(point);
    }

    pub fn position(&self) -> Option<&Point> {
        self.position.as_ref()
    }
}
