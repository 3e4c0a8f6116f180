use allo_controller::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
}

/// In-memory product list shared by every request.
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn sample() -> Self {
        let products = [("Espresso", 2.5), ("Cappuccino", 3.2), ("Flat White", 3.4)]
            .into_iter()
            .zip(1..)
            .map(|((name, price), id)| Product {
                id,
                name: name.to_string(),
                price,
            })
            .collect();
        Self { products }
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }
}

#[controller]
pub struct HomepageController {
    ctx: ControllerContext,
    catalog: Option<Arc<Catalog>>,
}

#[lifecycle]
impl HomepageController {
    fn inject_catalog(&mut self, catalog: Arc<Catalog>) {
        self.catalog = Some(catalog);
    }

    fn startup(&mut self) {
        self.add_event_listener(ControllerEvent::Render, |detail| {
            tracing::debug!(view = detail.view, "Rendering homepage");
        });
    }

    fn render_default(&mut self) -> Result<Flow> {
        let count = self.catalog.as_ref().map_or(0, |c| c.all().len());
        self.send_text(format!("Welcome! {count} products on the menu."))
    }

    async fn action_about(&mut self) -> Result<Flow> {
        self.send_json(
            &serde_json::json!({ "name": "allo-controller demo", "version": "0.1.0" }),
            true,
        )
    }

    fn action_menu(&mut self) -> Result<Flow> {
        self.redirect_url("/product/list")
    }
}

#[controller]
pub struct ProductController {
    ctx: ControllerContext,
    catalog: Option<Arc<Catalog>>,
}

#[lifecycle]
impl ProductController {
    fn inject_catalog(&mut self, catalog: Arc<Catalog>) {
        self.catalog = Some(catalog);
    }

    async fn action_show(&mut self, params: &Params) -> Result<Flow> {
        let product = params
            .get("id")
            .and_then(|id| id.parse().ok())
            .and_then(|id| self.catalog.as_ref()?.find(id).cloned());

        match product {
            Some(product) => self.send_json(&product, false),
            None => {
                self.set_view("missing");
                Ok(Flow::Continue)
            }
        }
    }

    fn render_list(&mut self) -> Result<Flow> {
        let products = self.catalog.as_ref().map(|c| c.all().to_vec());
        self.send_json(&products.unwrap_or_default(), true)
    }

    fn render_missing(&mut self) -> Result<Flow> {
        let response = HttpResponse::new(
            allo_controller::axum::http::StatusCode::NOT_FOUND,
            "No such product",
        );
        self.send_response(response)
    }

    fn shutdown(&mut self) {
        tracing::debug!(action = self.action(), "Product request finished");
    }
}
