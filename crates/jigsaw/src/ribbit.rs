//! Messaging with the Ribbit host page that embeds the bit.

use std::sync::{Arc, LazyLock};

use bevy::prelude::*;
use parking_lot::Mutex;
use ribbit_bits::{BitDuration, BitMessage, BitParameters, BitResult, RibbitMessage};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::MessageEvent;

use crate::game::{ActivePuzzle, GameState, LoadPuzzle};

/// Host messages waiting for the next `PostUpdate`.
pub static RIBBIT_INBOX: LazyLock<Arc<Mutex<Vec<RibbitMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

#[cfg(target_arch = "wasm32")]
fn listen_ribbit_messages() {
    let Some(window) = web_sys::window() else {
        error!("No global window, Ribbit messages will not be received");
        return;
    };
    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        match serde_wasm_bindgen::from_value::<RibbitMessage>(event.data()) {
            Ok(message) => RIBBIT_INBOX.lock().push(message),
            Err(err) => error!("Could not parse Ribbit message {:?}: {err}", event.data()),
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Err(err) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Could not listen to Ribbit messages: {err:?}");
        return;
    }

    // The listener lives as long as the page.
    closure.forget();
}

/// Native builds have no host page; the messages only go to the log.
#[cfg(not(target_arch = "wasm32"))]
pub fn send_bit_message(message: BitMessage) {
    info!("To host: {message:?}");
}

/// Keyboard stand-in for the host when running natively: R restarts, E ends.
#[cfg(not(target_arch = "wasm32"))]
fn simulate_host(keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyR) {
        RIBBIT_INBOX.lock().push(RibbitMessage::Restart);
    } else if keys.just_pressed(KeyCode::KeyE) {
        RIBBIT_INBOX.lock().push(RibbitMessage::End);
    }
}

#[cfg(target_arch = "wasm32")]
pub fn send_bit_message(message: BitMessage) {
    let Some(window) = web_sys::window() else {
        error!("{message:?} not sent, no global window");
        return;
    };
    let Ok(value) = serde_wasm_bindgen::to_value(&message) else {
        error!("Could not serialize {message:?}");
        return;
    };
    let Ok(Some(parent_window)) = window.parent() else {
        error!("{message:?} not sent, parent window not found");
        return;
    };
    if let Err(err) = parent_window.post_message(&value, "*") {
        error!("Could not post {message:?}: {err:?}");
    }
}

/// Answers to the host's requests. Called from the message pump, never by
/// the bit itself.
pub trait RibbitMessageHandler: Send + Sync + Default + 'static {
    fn duration(world: &mut World) -> BitDuration;
    fn end(world: &mut World) -> BitResult;
    fn restart(world: &mut World);
}

fn process_ribbit_messages<T: RibbitMessageHandler>(world: &mut World) {
    let messages = RIBBIT_INBOX.lock().drain(..).collect::<Vec<_>>();

    for message in messages {
        match message {
            RibbitMessage::Parameters => {
                let duration = T::duration(world);
                send_bit_message(BitMessage::Parameters(BitParameters { duration }));
            }
            RibbitMessage::Restart => T::restart(world),
            RibbitMessage::End => {
                let result = T::end(world);
                send_bit_message(BitMessage::End(result));
            }
            // The puzzle is playable as soon as it is built.
            RibbitMessage::Start => {}
        }
    }
}

fn ready() {
    send_bit_message(BitMessage::Ready);
}

#[derive(Default)]
pub struct RibbitPlugin<T: RibbitMessageHandler>(core::marker::PhantomData<T>);

impl<T: RibbitMessageHandler> Plugin for RibbitPlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, process_ribbit_messages::<T>);
        #[cfg(target_arch = "wasm32")]
        {
            app.add_systems(Startup, listen_ribbit_messages);
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.add_systems(Update, simulate_host);
        }
        app.add_systems(PostStartup, ready);
    }
}

#[derive(Default, Clone, Copy)]
pub struct Jigsaw;

impl RibbitMessageHandler for Jigsaw {
    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }

    fn end(world: &mut World) -> BitResult {
        info!("Ending Jigsaw");

        let solved = world
            .get_resource::<ActivePuzzle>()
            .is_some_and(ActivePuzzle::is_solved);
        world
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Ended);

        if solved {
            BitResult::Success
        } else {
            BitResult::Failure
        }
    }

    fn restart(world: &mut World) {
        info!("Restarting Jigsaw");
        world.send_event(LoadPuzzle);
    }
}
