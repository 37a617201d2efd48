/// Data models module
///
/// Row types for the six tables and the enums stored in their TEXT
/// columns. Models keep their fields private; handlers turn them into
/// the JSON views defined in `dto`.

mod text_enum;

mod enums;
pub use enums::{OrderStatus, Role, TransactionStatus, TransactionType};

mod user;
pub use user::User;

mod wallet;
pub use wallet::Wallet;

mod product;
pub use product::Product;

mod order;
pub use order::{Order, OrderItem, OrderWithItems};

mod transaction;
pub use transaction::{Transaction, TransactionRecord};
