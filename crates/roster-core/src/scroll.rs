//! When a scroll position should ask for the next page.

/// A snapshot of a scrollable list, in whatever unit the UI measures
/// (pixels, terminal rows, list entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollPosition {
  /// Distance scrolled from the top.
  pub offset:   u32,
  /// Height of the visible window.
  pub viewport: u32,
  /// Total height of the content.
  pub content:  u32,
}

impl ScrollPosition {
  pub fn new(offset: u32, viewport: u32, content: u32) -> Self {
    Self { offset, viewport, content }
  }

  /// How far down the content the bottom of the viewport is, in `0.0..=1.0`.
  /// Content that fits entirely in the viewport counts as fully scrolled.
  pub fn fraction(&self) -> f32 {
    if self.content == 0 {
      return 0.0;
    }
    let bottom = self.offset.saturating_add(self.viewport);
    (bottom as f32 / self.content as f32).min(1.0)
  }

  /// Content remaining below the viewport.
  pub fn remaining(&self) -> u32 {
    self
      .content
      .saturating_sub(self.offset.saturating_add(self.viewport))
  }
}

/// Threshold past which a list asks for more.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTrigger {
  /// Fire once the viewport bottom passes this fraction of the content.
  Fraction(f32),
  /// Fire once no more than this much content is left below the viewport.
  DistanceFromEnd(u32),
}

impl ScrollTrigger {
  /// Nested dropdown lists.
  pub const DROPDOWN: Self = Self::Fraction(0.8);
  /// Full-page infinite scroll, in pixels.
  pub const PAGE: Self = Self::DistanceFromEnd(300);

  pub fn is_reached(&self, position: ScrollPosition) -> bool {
    if position.content == 0 {
      return false;
    }
    match *self {
      Self::Fraction(threshold) => position.fraction() >= threshold,
      Self::DistanceFromEnd(distance) => position.remaining() <= distance,
    }
  }
}
