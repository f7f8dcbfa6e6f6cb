/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

mod recording_bridge;
pub use recording_bridge::{BridgedPublication, RecordingBridge};
mod recording_session;
pub use recording_session::RecordingSession;
mod stalling_session;
pub use stalling_session::StallingSession;
mod test_logging;
pub use test_logging::init_logging;
