use std::sync::RwLock;

use async_trait::async_trait;
use dulpromax_core::catalog::next_id;
use dulpromax_core::pricing::Segment;
use dulpromax_core::types::DbId;

use crate::error::{poisoned, StoreResult};
use crate::models::client::{Client, CreateClient, UpdateClient};
use crate::repositories::ClientRepository;

/// Client registry held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryClientRepo {
    clients: RwLock<Vec<Client>>,
}

impl InMemoryClientRepo {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry the service starts with: one health store, one
    /// distributor.
    pub fn seeded() -> Self {
        let clients = vec![
            Client {
                id: 1,
                name: "Tienda Vida Sana".into(),
                email: "info@vidasana.com".into(),
                segment: Segment::HealthStore,
                phone: "123-456-7890".into(),
                address: "Av. Principal 123".into(),
                city: "Bogotá".into(),
                base_discount: Segment::HealthStore.discount(),
            },
            Client {
                id: 2,
                name: "Distribuidora El Sol".into(),
                email: "ventas@elsol.com".into(),
                segment: Segment::Distributor,
                phone: "098-765-4321".into(),
                address: "Calle 45 #23-67".into(),
                city: "Medellín".into(),
                base_discount: Segment::Distributor.discount(),
            },
        ];
        Self {
            clients: RwLock::new(clients),
        }
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepo {
    async fn list(&self) -> StoreResult<Vec<Client>> {
        let clients = self.clients.read().map_err(|_| poisoned("client"))?;
        Ok(clients.clone())
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Client>> {
        let clients = self.clients.read().map_err(|_| poisoned("client"))?;
        Ok(clients.iter().find(|c| c.id == id).cloned())
    }

    async fn list_by_segment(&self, segment: Segment) -> StoreResult<Vec<Client>> {
        let clients = self.clients.read().map_err(|_| poisoned("client"))?;
        Ok(clients
            .iter()
            .filter(|c| c.segment == segment)
            .cloned()
            .collect())
    }

    async fn create(&self, input: &CreateClient, base_discount: f64) -> StoreResult<Client> {
        let mut clients = self.clients.write().map_err(|_| poisoned("client"))?;
        let client = Client {
            id: next_id(clients.iter().map(|c| c.id)),
            name: input.name.clone(),
            email: input.email.clone(),
            segment: input.segment,
            phone: input.phone.clone(),
            address: input.address.clone(),
            city: input.city.clone(),
            base_discount,
        };
        clients.push(client.clone());
        tracing::debug!(client_id = client.id, segment = %client.segment, "Registered client");
        Ok(client)
    }

    async fn update(&self, id: DbId, input: &UpdateClient) -> StoreResult<Option<Client>> {
        let mut clients = self.clients.write().map_err(|_| poisoned("client"))?;
        let Some(client) = clients.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            client.name = name.clone();
        }
        if let Some(email) = &input.email {
            client.email = email.clone();
        }
        if let Some(segment) = input.segment {
            client.segment = segment;
        }
        if let Some(phone) = &input.phone {
            client.phone = phone.clone();
        }
        if let Some(address) = &input.address {
            client.address = address.clone();
        }
        if let Some(city) = &input.city {
            client.city = city.clone();
        }
        if let Some(base_discount) = input.base_discount {
            client.base_discount = base_discount;
        }
        Ok(Some(client.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut clients = self.clients.write().map_err(|_| poisoned("client"))?;
        let before = clients.len();
        clients.retain(|c| c.id != id);
        Ok(clients.len() < before)
    }
}
