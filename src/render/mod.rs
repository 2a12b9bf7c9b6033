//! Disposable renders used to measure natural column widths.

mod buffer_host;
mod shadow;

pub use buffer_host::BufferHost;
pub use shadow::ShadowTable;

use tracing::trace;

use crate::domain::GridError;

/// Number of sample rows rendered by the shadow table.
pub const SHADOW_SAMPLE_ROWS: usize = 10;

/// Something that can render a shadow table off screen and report how wide
/// each column came out.
pub trait RenderHost {
    /// Renders the table into the host's scratch target.
    ///
    /// Fails with [`GridError::RenderTargetBusy`] if a table is already mounted.
    fn mount(&mut self, table: &ShadowTable) -> Result<(), GridError>;

    /// Rendered width of the column at `column`, if the render produced one.
    fn measure(&self, column: usize) -> Option<u16>;

    /// Disposes of the mounted table. Unmounting an empty target does nothing.
    fn unmount(&mut self);

    fn is_mounted(&self) -> bool;
}

/// Keeps a shadow table mounted for as long as it lives.
///
/// The table is unmounted when the guard is dropped, on every exit path.
pub struct MountGuard<'a, H: RenderHost + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: RenderHost + ?Sized> MountGuard<'a, H> {
    /// Mounts `table`. On failure the target is released before returning.
    ///
    /// A target that already holds a table is left alone and the call fails
    /// with [`GridError::RenderTargetBusy`].
    pub fn mount(host: &'a mut H, table: &ShadowTable) -> Result<Self, GridError> {
        if host.is_mounted() {
            return Err(GridError::RenderTargetBusy);
        }
        if let Err(e) = host.mount(table) {
            host.unmount();
            return Err(e);
        }
        trace!(
            "Mounted shadow table: {} columns, {} rows",
            table.columns().len(),
            table.rows().len()
        );
        Ok(Self { host })
    }

    pub fn measure(&self, column: usize) -> Option<u16> {
        self.host.measure(column)
    }
}

impl<H: RenderHost + ?Sized> Drop for MountGuard<'_, H> {
    fn drop(&mut self) {
        self.host.unmount();
        trace!("Unmounted shadow table");
    }
}
