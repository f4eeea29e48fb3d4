// ── Space navigator event bridge ──────────────────────────────────────────────
//
// Pure Rust half of the 3D input device support.  `platform::linux::spnav`
// owns the X11 filter and turns each native event into an
// `Option<RawPacket>`; everything from there on is typed and testable:
//
//   native event ─► RawPacket ─► decode() ─► MotionEvent ─► Viewport
//
// The filter runs inside GTK's event dispatch, so nothing here may block.

use std::rc::Rc;

use tracing::trace;

/// Scale from raw device rotation units to viewport rotation units.
pub const ROTATION_SCALE: f64 = 0.001;

// ── Raw packets ───────────────────────────────────────────────────────────────

/// A device packet as delivered by the driver, before any scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPacket {
    Motion {
        x: i32,
        y: i32,
        z: i32,
        rx: i32,
        ry: i32,
        rz: i32,
        /// Shift modifier state of the native event carrying the packet.
        shift: bool,
    },
    Button {
        press: bool,
        bnum: i32,
    },
    /// A packet kind this bridge does not understand.
    Unknown(i32),
}

// ── Decoded events ────────────────────────────────────────────────────────────

/// A normalized viewport command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    Translation {
        dx: f64,
        dy: f64,
        dz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        shift_held: bool,
    },
    ButtonRelease {
        button: u32,
    },
}

/// Map one raw packet to at most one viewport command.
///
/// The device Z axis points the other way from the viewport's, so `z` and
/// `rz` flip sign.  Only the release of button 0 produces an event.
pub fn decode(packet: RawPacket) -> Option<MotionEvent> {
    match packet {
        RawPacket::Motion {
            x,
            y,
            z,
            rx,
            ry,
            rz,
            shift,
        } => Some(MotionEvent::Translation {
            dx: f64::from(x),
            dy: f64::from(y),
            dz: f64::from(z) * -1.0,
            rx: f64::from(rx) * ROTATION_SCALE,
            ry: f64::from(ry) * ROTATION_SCALE,
            rz: f64::from(rz) * -ROTATION_SCALE,
            shift_held: shift,
        }),
        RawPacket::Button { press: false, bnum: 0 } => {
            Some(MotionEvent::ButtonRelease { button: 0 })
        }
        RawPacket::Button { .. } | RawPacket::Unknown(_) => None,
    }
}

// ── Viewport seam ─────────────────────────────────────────────────────────────

/// The 3D view that receives navigator input.
///
/// Methods take `&self`: the filter holds a shared handle and calls back
/// re-entrantly from the event loop.
pub trait Viewport {
    #[allow(clippy::too_many_arguments)]
    fn space_navigator_moved(
        &self,
        tx: f64,
        ty: f64,
        tz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        shift: bool,
    );

    fn space_navigator_button_up(&self);
}

/// Forward one decoded event to the viewport, synchronously.
pub fn dispatch(event: MotionEvent, viewport: &dyn Viewport) {
    match event {
        MotionEvent::Translation {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
            shift_held,
        } => viewport.space_navigator_moved(dx, dy, dz, rx, ry, rz, shift_held),
        MotionEvent::ButtonRelease { .. } => viewport.space_navigator_button_up(),
    }
}

// ── Filter state ──────────────────────────────────────────────────────────────

/// Whether the native event filter is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeState {
    #[default]
    Uninstalled,
    Installed,
}

/// What the native filter tells the toolkit to do with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Not a device event; normal dispatch continues.
    Ignored,
    /// Device event, consumed here; no other handler sees it.
    Dispatched,
}

/// One per display connection.  Owns the viewport handle the filter
/// forwards to.
pub struct DeviceBridge {
    viewport: Rc<dyn Viewport>,
    dispatched: u64,
}

impl DeviceBridge {
    pub fn new(viewport: Rc<dyn Viewport>) -> Self {
        Self {
            viewport,
            dispatched: 0,
        }
    }

    /// Handle one native event.  `packet` is `None` when the event does not
    /// belong to the device protocol.
    pub fn handle(&mut self, packet: Option<RawPacket>) -> FilterOutcome {
        let Some(packet) = packet else {
            return FilterOutcome::Ignored;
        };

        self.dispatched += 1;
        match decode(packet) {
            Some(event) => {
                trace!(?event, "space navigator");
                dispatch(event, self.viewport.as_ref());
            }
            None => trace!(?packet, "space navigator packet dropped"),
        }
        FilterOutcome::Dispatched
    }

    /// Device events consumed so far, including dropped ones.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
