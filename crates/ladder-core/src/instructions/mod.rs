/// Vault operations, one family per file, each an `impl Vault` block.
/// Share operations move assets and supply, the placement pass keeps the
/// venue in step with the configured funds state, and configuration covers
/// the manager's knobs.

// Share operations
pub mod burn; // Redeem shares for underlying
pub mod mint; // Deposit underlying for shares

// Manager rebalancing
pub mod swap;

// Funds placement state machine
pub mod update_position;

// Fee, cap, ladder and allow-list configuration
pub mod configure;
