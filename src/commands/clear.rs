use crate::libs::messages::Message;
use crate::libs::mirror::PersistenceMirror;
use crate::libs::stores::ranked_backends;
use crate::msg_success;
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let mut mirror = PersistenceMirror::new(ranked_backends(), 0);
    let cleared = mirror.clear();
    msg_success!(Message::MirrorCleared(cleared));
    Ok(())
}
