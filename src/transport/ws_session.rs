use crate::game::room::Room;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

pub async fn handle_socket(socket: WebSocket, room: Room) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let Some(session_id) = room.add_session(tx).await else {
        tracing::warn!("room is not running, dropping connection");
        return;
    };

    let send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => room.handle_text_message(&session_id, text),
            Message::Close(_) => break,
            _ => {}
        }
    }

    room.remove_session(&session_id);
    send_task.abort();
}
