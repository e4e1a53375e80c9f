//! Scroll-linked highlighting of the navigation container.
//!
//! The highlighting itself runs in the browser (Bootstrap's scrollspy or
//! similar). The pass only has to switch it on for the container.

use crate::dom::{Dom, NodeId};

/// Enables scroll-linked highlighting on a navigation container.
pub trait ScrollSpy {
    fn activate(&self, dom: &mut Dom, nav_container: NodeId);
}

/// Marks the container for Bootstrap's data API: `data-spy="scroll"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataApiScrollSpy;

impl ScrollSpy for DataApiScrollSpy {
    fn activate(&self, dom: &mut Dom, nav_container: NodeId) {
        dom.set_attr(nav_container, "data-spy", "scroll");
    }
}

/// Leaves the container untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScrollSpy;

impl ScrollSpy for NoScrollSpy {
    fn activate(&self, _dom: &mut Dom, _nav_container: NodeId) {}
}

impl<T: ScrollSpy + ?Sized> ScrollSpy for &T {
    fn activate(&self, dom: &mut Dom, nav_container: NodeId) {
        (**self).activate(dom, nav_container);
    }
}

impl<T: ScrollSpy + ?Sized> ScrollSpy for Box<T> {
    fn activate(&self, dom: &mut Dom, nav_container: NodeId) {
        (**self).activate(dom, nav_container);
    }
}
