/// Opens a payment session and obtains the hosted payment page
#[derive(Debug, Clone)]
pub struct InitPayment;

/// Executes a transaction (capture, void, credit...) on an existing payment
#[derive(Debug, Clone)]
pub struct Transaction;
