#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    arima_intake_lib::run().await
}
