use super::text_enum::text_enum;

text_enum! {
    /// What a user account can do: pay vendors or sell to customers
    pub enum Role {
        Customer => "CUSTOMER",
        Vendor => "VENDOR",
    }
}

text_enum! {
    /// Lifecycle of an order. QR orders start pending and complete once paid
    pub enum OrderStatus {
        Pending => "pending",
        Completed => "completed",
    }
}

text_enum! {
    /// Why a transaction moved money
    pub enum TransactionType {
        Payment => "PAYMENT",
        AddFunds => "ADD_FUNDS",
        Refund => "REFUND",
    }
}

text_enum! {
    pub enum TransactionStatus {
        Pending => "PENDING",
        Completed => "COMPLETED",
        Failed => "FAILED",
    }
}
