use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    outbox_lambda_send_email::run().await
}
