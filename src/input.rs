use std::fmt::Display;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;

use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyModifiers};

pub const QUIT_KEY: char = 'q';

// One key waits in the queue while the reader blocks on the next, so the oldest
// unread key is always the one the game loop sees first.
const QUEUE_DEPTH: usize = 1;

pub fn channel() -> (SyncSender<char>, Receiver<char>) {
    sync_channel(QUEUE_DEPTH)
}

/// Starts a thread relaying `keys` into the returned queue. The thread stops after
/// relaying the quit key, on the first read error, or when the receiver is dropped.
pub fn spawn<I, E>(keys: I) -> Receiver<char>
where
    I: IntoIterator<Item = Result<char, E>>,
    I::IntoIter: Send + 'static,
    E: Display,
{
    let (tx, rx) = channel();
    let keys = keys.into_iter();
    thread::spawn(move || relay(keys, tx));
    rx
}

/// Blocking key reads from the terminal, translated to characters.
pub fn terminal_keys() -> impl Iterator<Item = crossterm::Result<char>> + Send + 'static {
    std::iter::from_fn(|| loop {
        match read() {
            Ok(Event::Key(ev)) => {
                if let Some(ch) = key_char(&ev) {
                    return Some(Ok(ch));
                }
            }
            Ok(_) => {}
            Err(e) => return Some(Err(e)),
        }
    })
}

/// Arrow keys stand in for `wasd`. Raw mode swallows the interrupt signal, so
/// Ctrl+C quits too.
pub fn key_char(ev: &KeyEvent) -> Option<char> {
    match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers }
            if modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(QUIT_KEY)
        }
        KeyEvent { code, .. } => match code {
            KeyCode::Char(ch) => Some(*ch),
            KeyCode::Up => Some('w'),
            KeyCode::Left => Some('a'),
            KeyCode::Down => Some('s'),
            KeyCode::Right => Some('d'),
            _ => None,
        },
    }
}

fn relay<I, E>(keys: I, tx: SyncSender<char>)
where
    I: Iterator<Item = Result<char, E>>,
    E: Display,
{
    for key in keys {
        let ch = match key {
            Ok(ch) => ch,
            Err(e) => {
                log::warn!("reading input failed, no more keys will be read: {}", e);
                return;
            }
        };

        if tx.send(ch).is_err() {
            log::debug!("game loop is gone, input reader stopping");
            return;
        }

        if ch == QUIT_KEY {
            log::debug!("quit key read, input reader stopping");
            return;
        }
    }

    log::debug!("end of input");
}
