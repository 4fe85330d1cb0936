//! Global keyboard shortcuts via evdev
//!
//! Reads key events directly from `/dev/input/event*` so a capture can be
//! triggered while another window has focus.

use evdev::{Device, InputEventKind, Key};
use std::collections::HashSet;
use std::os::fd::AsRawFd;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use crate::error::{Result, ShutterError};

/// What a shortcut does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    /// Take a screenshot
    Capture,
}

/// A shortcut binding (modifier keys + trigger key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    /// Modifier keys that must be held
    pub modifiers: HashSet<Key>,
    /// The trigger key
    pub key: Key,
    /// The action to perform
    pub action: HotkeyAction,
}

impl Hotkey {
    /// Create a new binding
    pub fn new(modifiers: impl IntoIterator<Item = Key>, key: Key, action: HotkeyAction) -> Self {
        Self {
            modifiers: modifiers.into_iter().collect(),
            key,
            action,
        }
    }

    /// Parse a shortcut string like "ctrl+shift+s"
    pub fn parse(s: &str, action: HotkeyAction) -> Result<Self> {
        let mut modifiers = HashSet::new();
        let mut key = None;

        for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => {
                    modifiers.insert(Key::KEY_LEFTCTRL);
                }
                "alt" => {
                    modifiers.insert(Key::KEY_LEFTALT);
                }
                "shift" => {
                    modifiers.insert(Key::KEY_LEFTSHIFT);
                }
                "super" | "meta" | "win" => {
                    modifiers.insert(Key::KEY_LEFTMETA);
                }
                other => {
                    if key.is_some() {
                        return Err(ShutterError::hotkey(format!(
                            "More than one key in shortcut '{}'",
                            s
                        )));
                    }
                    key = Some(parse_key(other)?);
                }
            }
        }

        let key = key.ok_or_else(|| ShutterError::hotkey(format!("No key in shortcut '{}'", s)))?;

        Ok(Self {
            modifiers,
            key,
            action,
        })
    }
}

const LETTERS: [Key; 26] = [
    Key::KEY_A, Key::KEY_B, Key::KEY_C, Key::KEY_D, Key::KEY_E, Key::KEY_F, Key::KEY_G,
    Key::KEY_H, Key::KEY_I, Key::KEY_J, Key::KEY_K, Key::KEY_L, Key::KEY_M, Key::KEY_N,
    Key::KEY_O, Key::KEY_P, Key::KEY_Q, Key::KEY_R, Key::KEY_S, Key::KEY_T, Key::KEY_U,
    Key::KEY_V, Key::KEY_W, Key::KEY_X, Key::KEY_Y, Key::KEY_Z,
];

const DIGITS: [Key; 10] = [
    Key::KEY_0, Key::KEY_1, Key::KEY_2, Key::KEY_3, Key::KEY_4,
    Key::KEY_5, Key::KEY_6, Key::KEY_7, Key::KEY_8, Key::KEY_9,
];

const FUNCTION_KEYS: [Key; 12] = [
    Key::KEY_F1, Key::KEY_F2, Key::KEY_F3, Key::KEY_F4, Key::KEY_F5, Key::KEY_F6,
    Key::KEY_F7, Key::KEY_F8, Key::KEY_F9, Key::KEY_F10, Key::KEY_F11, Key::KEY_F12,
];

/// Parse a key name to an evdev Key
fn parse_key(name: &str) -> Result<Key> {
    let name = name.to_lowercase();
    let unknown = || ShutterError::hotkey(format!("Unknown key: {}", name));

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return match c {
            'a'..='z' => Ok(LETTERS[(c as u8 - b'a') as usize]),
            '0'..='9' => Ok(DIGITS[(c as u8 - b'0') as usize]),
            _ => Err(unknown()),
        };
    }

    if let Some(n) = name.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        return match n {
            1..=12 => Ok(FUNCTION_KEYS[n - 1]),
            _ => Err(unknown()),
        };
    }

    let key = match name.as_str() {
        "space" => Key::KEY_SPACE,
        "enter" | "return" => Key::KEY_ENTER,
        "escape" | "esc" => Key::KEY_ESC,
        "tab" => Key::KEY_TAB,
        "insert" | "ins" => Key::KEY_INSERT,
        "delete" | "del" => Key::KEY_DELETE,
        "home" => Key::KEY_HOME,
        "end" => Key::KEY_END,
        "pageup" | "pgup" => Key::KEY_PAGEUP,
        "pagedown" | "pgdn" => Key::KEY_PAGEDOWN,
        "printscreen" | "print" | "prtsc" => Key::KEY_SYSRQ,
        "pause" => Key::KEY_PAUSE,
        "scrolllock" => Key::KEY_SCROLLLOCK,
        _ => return Err(unknown()),
    };

    Ok(key)
}

/// Global shortcut listener
pub struct HotkeyListener {
    /// Registered bindings
    hotkeys: Vec<Hotkey>,
    /// Action sender
    action_tx: mpsc::Sender<HotkeyAction>,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Listener thread handle
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl HotkeyListener {
    /// Create a new listener
    ///
    /// Returns the listener and a receiver for triggered actions.
    pub fn new(hotkeys: Vec<Hotkey>) -> (Self, mpsc::Receiver<HotkeyAction>) {
        let (action_tx, action_rx) = mpsc::channel(16);

        (
            Self {
                hotkeys,
                action_tx,
                running: Arc::new(AtomicBool::new(false)),
                thread_handle: None,
            },
            action_rx,
        )
    }

    /// Create a listener with a single capture shortcut
    pub fn for_capture(shortcut: &str) -> Result<(Self, mpsc::Receiver<HotkeyAction>)> {
        let hotkey = Hotkey::parse(shortcut, HotkeyAction::Capture)?;
        Ok(Self::new(vec![hotkey]))
    }

    /// Start listening
    pub fn start(&mut self) -> Result<()> {
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        let hotkeys = self.hotkeys.clone();
        let action_tx = self.action_tx.clone();
        let running = self.running.clone();

        running.store(true, Ordering::SeqCst);

        let thread = std::thread::Builder::new()
            .name("shutter-hotkeys".to_string())
            .spawn(move || {
                if let Err(e) = run_hotkey_loop(hotkeys, action_tx, running.clone()) {
                    error!("Hotkey listener error: {}", e);
                }
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| ShutterError::hotkey(format!("Failed to spawn hotkey thread: {}", e)))?;

        self.thread_handle = Some(thread);
        info!("Hotkey listener started");

        Ok(())
    }

    /// Stop listening
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            info!("Hotkey listener stopped");
        }
    }

    /// Check if the listener is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open every input device that looks like a keyboard
fn find_keyboard_devices() -> Vec<Device> {
    let Ok(entries) = std::fs::read_dir("/dev/input") else {
        return Vec::new();
    };

    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("event"))
        })
        .filter_map(|path| match Device::open(&path) {
            Ok(device) => Some((path, device)),
            Err(e) => {
                trace!("Could not open {:?}: {}", path, e);
                None
            }
        })
        .filter(|(_, device)| {
            device
                .supported_keys()
                .is_some_and(|keys| keys.contains(Key::KEY_A) && keys.contains(Key::KEY_ENTER))
        })
        .map(|(path, device)| {
            debug!(
                "Found keyboard device: {:?} - {}",
                path,
                device.name().unwrap_or("unknown")
            );
            device
        })
        .collect()
}

/// Run the listening loop until `running` is cleared
fn run_hotkey_loop(
    hotkeys: Vec<Hotkey>,
    action_tx: mpsc::Sender<HotkeyAction>,
    running: Arc<AtomicBool>,
) -> Result<()> {
    let devices = find_keyboard_devices();

    if devices.is_empty() {
        warn!("No keyboard devices found. Shortcuts will not work.");
        warn!("Make sure you have permission to read /dev/input/event* devices.");
        return Err(ShutterError::hotkey("No keyboard devices found"));
    }

    let mut devices = keep_nonblocking(devices, set_nonblocking::<Device>);
    if devices.is_empty() {
        return Err(ShutterError::hotkey(
            "No keyboard device could be switched to non-blocking reads",
        ));
    }

    info!("Monitoring {} keyboard device(s) for shortcuts", devices.len());

    let mut pressed_keys: HashSet<Key> = HashSet::new();

    while running.load(Ordering::SeqCst) {
        for device in &mut devices {
            let Ok(events) = device.fetch_events() else {
                continue;
            };

            for event in events {
                let InputEventKind::Key(key) = event.kind() else {
                    continue;
                };

                match event.value() {
                    1 => {
                        pressed_keys.insert(key);
                        for hotkey in hotkeys.iter().filter(|h| h.key == key) {
                            if check_hotkey(&pressed_keys, hotkey) {
                                info!("Shortcut triggered: {:?}", hotkey.action);
                                if action_tx.blocking_send(hotkey.action).is_err() {
                                    debug!("Action receiver dropped");
                                    return Ok(());
                                }
                            }
                        }
                    }
                    0 => {
                        pressed_keys.remove(&key);
                    }
                    // Autorepeat must not fire a second capture
                    _ => {}
                }
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    Ok(())
}

/// Keep only the devices that could be made non-blocking
///
/// A blocking device would leave the loop stuck in `fetch_events` and
/// `stop` waiting on the thread forever.
fn keep_nonblocking<D>(
    devices: Vec<D>,
    make_nonblocking: impl Fn(&D) -> std::io::Result<()>,
) -> Vec<D> {
    devices
        .into_iter()
        .filter(|device| match make_nonblocking(device) {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping keyboard device that cannot be non-blocking: {}", e);
                false
            }
        })
        .collect()
}

/// Put a device fd into non-blocking mode so `stop` is not stuck on a read
fn set_nonblocking<F: AsRawFd>(file: &F) -> std::io::Result<()> {
    let fd = file.as_raw_fd();
    // SAFETY: fd is a valid open descriptor owned by `file` for this call.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error());
    }
    // SAFETY: same descriptor; only O_NONBLOCK is added.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Check if a binding matches the currently pressed keys
fn check_hotkey(pressed: &HashSet<Key>, hotkey: &Hotkey) -> bool {
    if !pressed.contains(&hotkey.key) {
        return false;
    }

    // Left and right variants of a modifier are interchangeable
    hotkey.modifiers.iter().all(|modifier| match *modifier {
        Key::KEY_LEFTCTRL => {
            pressed.contains(&Key::KEY_LEFTCTRL) || pressed.contains(&Key::KEY_RIGHTCTRL)
        }
        Key::KEY_LEFTALT => {
            pressed.contains(&Key::KEY_LEFTALT) || pressed.contains(&Key::KEY_RIGHTALT)
        }
        Key::KEY_LEFTSHIFT => {
            pressed.contains(&Key::KEY_LEFTSHIFT) || pressed.contains(&Key::KEY_RIGHTSHIFT)
        }
        Key::KEY_LEFTMETA => {
            pressed.contains(&Key::KEY_LEFTMETA) || pressed.contains(&Key::KEY_RIGHTMETA)
        }
        _ => pressed.contains(modifier),
    })
}
