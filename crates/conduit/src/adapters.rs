// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider dispatch for the CLI commands.

/// Builds the adapter for `$provider` from config and evaluates `$body`
/// with it bound to `$adapter`. Construction errors are returned with `?`.
macro_rules! with_adapter {
    ($provider:expr, $config:expr, $adapter:ident => $body:expr) => {
        match $provider {
            conduit_core::Provider::Msg91 => {
                let $adapter = conduit_msg91::Msg91Integration::from_config($config)?;
                $body
            }
            conduit_core::Provider::Telegram => {
                let $adapter = conduit_telegram::TelegramIntegration::from_config($config)?;
                $body
            }
            conduit_core::Provider::WhatsApp => {
                let $adapter = conduit_whatsapp::WhatsAppIntegration::from_config($config)?;
                $body
            }
            conduit_core::Provider::Shiprocket => {
                let $adapter = conduit_shiprocket::ShiprocketIntegration::from_config($config)?;
                $body
            }
            conduit_core::Provider::Cashfree => {
                let $adapter = conduit_cashfree::CashfreeIntegration::from_config($config)?;
                $body
            }
        }
    };
}

pub(crate) use with_adapter;
