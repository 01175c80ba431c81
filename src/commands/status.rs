use crate::libs::messages::Message;
use crate::libs::mirror::PersistenceMirror;
use crate::libs::stores::ranked_backends;
use crate::libs::view::View;
use crate::msg_info;
use anyhow::Result;

/// Prints the status the most recent `track` run mirrored, read from the
/// first store that has one.
pub fn cmd() -> Result<()> {
    let mirror = PersistenceMirror::new(ranked_backends(), 0);
    match mirror.read() {
        Some(status) => View::status(&status),
        None => msg_info!(Message::NoStatusRecorded),
    }
    Ok(())
}
