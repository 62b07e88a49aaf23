//! Window and window-class style flags
//!
//! Bit values match the Win32 `WS_*` and `CS_*` constants so that native
//! backends can pass `bits()` straight through. Other backends interpret the
//! flags themselves.

use bitflags::bitflags;

bitflags! {
    /// Window style bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowStyle: u32 {
        /// Thin-line border
        const BORDER = 0x0080_0000;
        /// Dialog-style border (half of `CAPTION`)
        const DLG_FRAME = 0x0040_0000;
        /// Title bar; includes `BORDER`
        const CAPTION = Self::BORDER.bits() | Self::DLG_FRAME.bits();
        /// Window menu in the title bar
        const SYS_MENU = 0x0008_0000;
        /// Resizable sizing border
        const THICK_FRAME = 0x0004_0000;
        /// Minimize button
        const MINIMIZE_BOX = 0x0002_0000;
        /// Maximize button
        const MAXIMIZE_BOX = 0x0001_0000;
        /// Exclude child areas when painting the parent
        const CLIP_CHILDREN = 0x0200_0000;
        /// Clip sibling windows relative to each other
        const CLIP_SIBLINGS = 0x0400_0000;
        /// Standard overlapped top-level window
        const OVERLAPPED_WINDOW = Self::CAPTION.bits()
            | Self::SYS_MENU.bits()
            | Self::THICK_FRAME.bits()
            | Self::MINIMIZE_BOX.bits()
            | Self::MAXIMIZE_BOX.bits();
    }
}

impl WindowStyle {
    /// Style used for surfaces created by [`SurfaceWindow::create`](crate::SurfaceWindow::create)
    pub const fn surface() -> Self {
        Self::CLIP_CHILDREN
            .union(Self::CLIP_SIBLINGS)
            .union(Self::OVERLAPPED_WINDOW)
            .union(Self::BORDER)
    }

    /// Decoration bits removed when the frame is hidden
    pub const fn frame() -> Self {
        Self::CAPTION.union(Self::THICK_FRAME)
    }

    /// Whether the style shows a title bar
    pub const fn has_caption(self) -> bool {
        self.contains(Self::CAPTION)
    }
}

bitflags! {
    /// Window class style bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassStyle: u32 {
        /// Redraw on vertical size change
        const VREDRAW = 0x0001;
        /// Redraw on horizontal size change
        const HREDRAW = 0x0002;
        /// Deliver double-click messages
        const DBL_CLKS = 0x0008;
    }
}

impl ClassStyle {
    /// Class style registered for surface windows
    pub const fn surface() -> Self {
        Self::HREDRAW.union(Self::VREDRAW).union(Self::DBL_CLKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_style_matches_native_bits() {
        // WS_CLIPCHILDREN | WS_CLIPSIBLINGS | WS_OVERLAPPEDWINDOW | WS_BORDER
        assert_eq!(WindowStyle::surface().bits(), 0x06CF_0000);
        assert_eq!(ClassStyle::surface().bits(), 0x000B);
    }

    #[test]
    fn test_removing_frame_drops_caption_and_sizing_border() {
        let stripped = WindowStyle::surface().difference(WindowStyle::frame());

        assert!(!stripped.has_caption());
        assert!(!stripped.contains(WindowStyle::THICK_FRAME));
        assert!(!stripped.contains(WindowStyle::BORDER));
        assert!(stripped.contains(WindowStyle::CLIP_CHILDREN | WindowStyle::CLIP_SIBLINGS));
        assert!(stripped.contains(WindowStyle::SYS_MENU));
    }
}
