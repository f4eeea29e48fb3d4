// ── Space navigator over X11 ──────────────────────────────────────────────────
//
// spacenavd delivers device packets as X ClientMessage events on the window
// bound with `spnav_x11_open`.  A GDK filter sees every X event before GTK
// does; `packet_from_xevent` is the single place where the opaque event is
// read, and everything after it is `device::DeviceBridge`.

#![allow(unsafe_code)]

use std::{
    ffi::c_void,
    os::raw::{c_int, c_uint},
    rc::Rc,
};

use gdk::ffi::{GdkEvent, GdkFilterReturn, GdkXEvent, GDK_FILTER_CONTINUE, GDK_FILTER_REMOVE};
use tracing::debug;
use x11::xlib;

use crate::device::{BridgeState, DeviceBridge, FilterOutcome, RawPacket, Viewport};

// ── libspnav ABI (spnav.h) ────────────────────────────────────────────────────

const SPNAV_EVENT_MOTION: c_int = 1;
const SPNAV_EVENT_BUTTON: c_int = 2;

// Fields not read from Rust still define the layout.
#[allow(dead_code)]
#[repr(C)]
#[derive(Clone, Copy)]
struct SpnavEventMotion {
    kind: c_int,
    x: c_int,
    y: c_int,
    z: c_int,
    rx: c_int,
    ry: c_int,
    rz: c_int,
    period: c_uint,
    data: *mut c_int,
}

#[allow(dead_code)]
#[repr(C)]
#[derive(Clone, Copy)]
struct SpnavEventButton {
    kind: c_int,
    press: c_int,
    bnum: c_int,
}

#[repr(C)]
union SpnavEvent {
    kind: c_int,
    motion: SpnavEventMotion,
    button: SpnavEventButton,
}

// Linked by build.rs when the `spaceware` feature is on.
extern "C" {
    fn spnav_x11_open(display: *mut xlib::Display, window: xlib::Window) -> c_int;
    fn spnav_x11_event(xevent: *const xlib::XEvent, event: *mut SpnavEvent) -> c_int;
}

// ── Decode boundary ───────────────────────────────────────────────────────────

/// Read one native X event.  `None` when it is not a spacenavd event.
///
/// # Safety
/// `xevent` must point to a valid `XEvent` for the duration of the call.
unsafe fn packet_from_xevent(xevent: *const xlib::XEvent) -> Option<RawPacket> {
    let mut sev = SpnavEvent { kind: 0 };
    // SAFETY: caller guarantees `xevent`; `sev` is a writable spnav_event.
    if unsafe { spnav_x11_event(xevent, &mut sev) } == 0 {
        return None;
    }

    // SAFETY: every union variant starts with the `type` int, and libspnav
    // fills the variant named by it.
    let packet = unsafe {
        match sev.kind {
            SPNAV_EVENT_MOTION => {
                let m = sev.motion;
                RawPacket::Motion {
                    x: m.x,
                    y: m.y,
                    z: m.z,
                    rx: m.rx,
                    ry: m.ry,
                    rz: m.rz,
                    shift: (*xevent).motion.state & xlib::ShiftMask != 0,
                }
            }
            SPNAV_EVENT_BUTTON => {
                let b = sev.button;
                RawPacket::Button {
                    press: b.press != 0,
                    bnum: b.bnum,
                }
            }
            other => RawPacket::Unknown(other),
        }
    };
    Some(packet)
}

unsafe extern "C" fn spnav_filter(
    xevent: *mut GdkXEvent,
    _event: *mut GdkEvent,
    data: *mut c_void,
) -> GdkFilterReturn {
    // SAFETY: `data` is the `DeviceBridge` leaked in `install`, only ever
    // touched from the GDK main thread that invokes this filter.
    let bridge = unsafe { &mut *data.cast::<DeviceBridge>() };
    // SAFETY: GDK passes the XEvent being dispatched.
    let packet = unsafe { packet_from_xevent(xevent.cast::<xlib::XEvent>()) };
    match bridge.handle(packet) {
        FilterOutcome::Ignored => GDK_FILTER_CONTINUE,
        FilterOutcome::Dispatched => GDK_FILTER_REMOVE,
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Register the filter on all GDK windows.  The bridge lives for the rest of
/// the process; the filter is never removed.
pub(crate) fn install(viewport: Rc<dyn Viewport>) -> BridgeState {
    let bridge = Box::into_raw(Box::new(DeviceBridge::new(viewport)));
    // SAFETY: called on the GTK main thread after gtk_init.  A NULL window
    // installs a global filter.  `bridge` is never freed, so the pointer
    // stays valid for every future callback.
    unsafe {
        gdk::ffi::gdk_window_add_filter(std::ptr::null_mut(), Some(spnav_filter), bridge.cast());
    }
    BridgeState::Installed
}

/// Tell spacenavd to send events to `window`.  `false` when the daemon is
/// not running.
pub(crate) fn open(display: &gdkx11::X11Display, window: &gdkx11::X11Window) -> bool {
    // SAFETY: the Xlib display belongs to the default GDK display, which
    // outlives the process's use of the device.
    let xdisplay = unsafe { display.xdisplay() };
    let xid = window.xid();
    // SAFETY: `xdisplay` is a live connection and `xid` a realized window on
    // it.
    let ret = unsafe { spnav_x11_open(xdisplay.cast(), xid) };
    debug!(ret, xid, "spnav_x11_open");
    ret != -1
}
