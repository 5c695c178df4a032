// ═══════════════════════════════════════════════════════════════════
// Integration Tests — the TourbookClient facade end to end: login,
// browse, add → update → remove, checkout, logout
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use tourbook_core::api::auth::{AuthApi, LoginResponse, NewAccount};
use tourbook_core::api::bookings::{BookingPage, BookingsApi};
use tourbook_core::api::cart::CartApi;
use tourbook_core::api::checkout::CheckoutApi;
use tourbook_core::api::http::MemoryTokenStore;
use tourbook_core::api::payments::PaymentsApi;
use tourbook_core::api::pois::{PoiQuery, PoisApi};
use tourbook_core::api::tickets::{TicketPage, TicketQuery, TicketsApi};
use tourbook_core::api::tours::{TourOptionQuery, ToursApi};
use tourbook_core::checkout::CheckoutDraft;
use tourbook_core::errors::CoreError;
use tourbook_core::models::booking::Booking;
use tourbook_core::models::cart::{Cart, CartItem, CartItemKind};
use tourbook_core::models::checkout::{CheckoutItem, CheckoutLink, InstantReceipt};
use tourbook_core::models::payment::{Payment, PaymentStatus};
use tourbook_core::models::poi::Poi;
use tourbook_core::models::ticket::{Ticket, TicketBooking, TicketStatus};
use tourbook_core::models::tour::{Destination, Tour, TourOption, TourOptionStatus};
use tourbook_core::models::user::User;
use tourbook_core::session::Session;
use tourbook_core::TourbookClient;

// ═══════════════════════════════════════════════════════════════════
// Mock backend
// ═══════════════════════════════════════════════════════════════════

fn sample_user() -> User {
    User {
        id: "U1".into(),
        name: "Alice".into(),
        email: "alice@example.com".into(),
        role: Some("user".into()),
        phone: Some("+84901234567".into()),
        address: None,
        is_active: Some(true),
    }
}

struct MockAuthApi;

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, CoreError> {
        Ok(LoginResponse {
            token: "tok".into(),
            user: sample_user(),
        })
    }

    async fn register(&self, _account: &NewAccount) -> Result<User, CoreError> {
        Ok(sample_user())
    }

    async fn me(&self) -> Result<User, CoreError> {
        Ok(sample_user())
    }
}

/// Server-side cart ledger; checkout settlement removes purchased items,
/// which clients only observe through a refresh.
struct MockBackend {
    ledger: Mutex<Cart>,
    next_id: Mutex<u32>,
}

impl MockBackend {
    fn new() -> Self {
        Self {
            ledger: Mutex::new(Cart {
                user_id: "U1".into(),
                items: vec![],
            }),
            next_id: Mutex::new(1),
        }
    }
}

#[async_trait]
impl CartApi for MockBackend {
    async fn get_cart(&self) -> Result<Cart, CoreError> {
        Ok(self.ledger.lock().unwrap().clone())
    }

    async fn add_tour_item(
        &self,
        tour_id: &str,
        option_id: &str,
        qty: u32,
    ) -> Result<Cart, CoreError> {
        let mut ledger = self.ledger.lock().unwrap();
        let id = {
            let mut next = self.next_id.lock().unwrap();
            let id = format!("C{next}");
            *next += 1;
            id
        };
        ledger.items.push(CartItem {
            id,
            kind: CartItemKind::Tour,
            ref_id: tour_id.into(),
            option_id: option_id.into(),
            qty,
            unit_price: 500_000.0,
        });
        Ok(ledger.clone())
    }

    async fn update_item_qty(&self, item_id: &str, qty: u32) -> Result<Cart, CoreError> {
        let mut ledger = self.ledger.lock().unwrap();
        let item = ledger
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.into()))?;
        item.qty = qty;
        Ok(ledger.clone())
    }

    async fn remove_item(&self, item_id: &str) -> Result<Cart, CoreError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.items.retain(|i| i.id != item_id);
        Ok(ledger.clone())
    }
}

#[async_trait]
impl CheckoutApi for MockBackend {
    async fn create_checkout(&self, items: &[CheckoutItem]) -> Result<CheckoutLink, CoreError> {
        self.settle(items);
        Ok(CheckoutLink {
            provider: "payos".into(),
            order_code: 7001,
            checkout_url: Some("https://pay.example/7001".into()),
            qr_code: None,
        })
    }

    async fn create_checkout_instant(
        &self,
        items: &[CheckoutItem],
    ) -> Result<InstantReceipt, CoreError> {
        self.settle(items);
        Ok(InstantReceipt {
            order_code: 7002,
            ok: true,
        })
    }
}

impl MockBackend {
    fn settle(&self, items: &[CheckoutItem]) {
        let mut ledger = self.ledger.lock().unwrap();
        ledger
            .items
            .retain(|i| !items.iter().any(|entry| entry.cart_item_id == i.id));
    }
}

struct MockCatalog;

#[async_trait]
impl ToursApi for MockCatalog {
    async fn list_tours(&self, destination_id: Option<&str>) -> Result<Vec<Tour>, CoreError> {
        let tour = Tour {
            id: "T1".into(),
            destination_id: "D1".into(),
            title: "Island Hopping".into(),
            summary: String::new(),
            description: String::new(),
            price: 500_000.0,
            duration_hr: 6.0,
            is_active: true,
            images: vec![],
            rating_avg: Some(4.6),
            policy: None,
        };
        Ok(match destination_id {
            Some("D1") | None => vec![tour],
            Some(_) => vec![],
        })
    }

    async fn get_tour(&self, tour_id: &str) -> Result<Tour, CoreError> {
        self.list_tours(None)
            .await?
            .into_iter()
            .find(|t| t.id == tour_id)
            .ok_or_else(|| CoreError::Api {
                status: 404,
                message: "Tour not found".into(),
            })
    }

    async fn list_tour_options(
        &self,
        tour_id: &str,
        query: &TourOptionQuery,
    ) -> Result<Vec<TourOption>, CoreError> {
        let open = TourOption {
            id: "O1".into(),
            tour_id: tour_id.into(),
            start_date: "2026-09-15".parse().expect("date"),
            start_time: Some("08:00".into()),
            capacity_total: 20,
            capacity_sold: 5,
            cut_off_hours: Some(12),
            status: TourOptionStatus::Open,
        };
        let full = TourOption {
            id: "O2".into(),
            status: TourOptionStatus::Full,
            capacity_sold: 20,
            ..open.clone()
        };
        let mut options = vec![open, full];
        if query.only_open {
            options.retain(|o| o.status == TourOptionStatus::Open);
        }
        Ok(options)
    }

    async fn list_destinations(&self) -> Result<Vec<Destination>, CoreError> {
        Ok(vec![Destination {
            id: "D1".into(),
            code: "PQC".into(),
            name: "Phu Quoc".into(),
            region: Some("South".into()),
            description: None,
            is_active: true,
            images: vec![],
        }])
    }
}

struct MockPois;

#[async_trait]
impl PoisApi for MockPois {
    async fn list_pois(&self, query: &PoiQuery) -> Result<Vec<Poi>, CoreError> {
        let poi = Poi {
            id: "P1".into(),
            destination_id: "D1".into(),
            name: "Night Market".into(),
            kind: Some("market".into()),
            duration_min: Some(90),
            price_est: None,
            is_active: true,
            images: vec![],
            open_from: Some("17:00".into()),
            open_to: Some("23:00".into()),
            tags: vec!["food".into()],
            geo: None,
        };
        Ok(match query.destination_id.as_deref() {
            Some("D1") | None => vec![poi],
            Some(_) => vec![],
        })
    }
}

struct MockBookings;

#[async_trait]
impl BookingsApi for MockBookings {
    async fn list_my_bookings(&self, page: u32, limit: u32) -> Result<BookingPage, CoreError> {
        Ok(BookingPage {
            items: vec![],
            total: 0,
            page,
            limit,
        })
    }

    async fn get_my_booking(&self, booking_id: &str) -> Result<Booking, CoreError> {
        Err(CoreError::Api {
            status: 404,
            message: format!("Booking {booking_id} not found"),
        })
    }
}

/// Ticket and payment desks: one valid ticket looked up by id or code,
/// one settled payment.
struct MockWallet;

fn sample_ticket() -> Ticket {
    Ticket {
        id: "TK1".into(),
        code: "TRB-7002".into(),
        qr_payload: "tourbook:TK1".into(),
        status: TicketStatus::Valid,
        used_at: None,
        pickup_note: Some("Pier 3, 07:30".into()),
        passenger: None,
        booking: TicketBooking {
            id: "B1".into(),
            start_date: Some("2026-09-15".parse().expect("date")),
            start_time: Some("08:00".into()),
            qty: Some(2),
            total: Some(1_000_000.0),
            snapshot_title: Some("Island Hopping".into()),
            snapshot_destination_name: Some("Phu Quoc".into()),
        },
        created_at: "2026-08-30T10:00:00Z".parse().expect("timestamp"),
        updated_at: "2026-08-30T10:00:00Z".parse().expect("timestamp"),
    }
}

#[async_trait]
impl TicketsApi for MockWallet {
    async fn list_my_tickets(&self, query: &TicketQuery) -> Result<TicketPage, CoreError> {
        let mut rows = vec![sample_ticket()];
        if let Some(status) = query.status {
            rows.retain(|t| t.status == status);
        }
        let total = rows.len() as u64;
        Ok(TicketPage {
            rows,
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(20),
            total,
        })
    }

    async fn get_my_ticket(&self, ticket_id: &str) -> Result<Ticket, CoreError> {
        let ticket = sample_ticket();
        if ticket.id == ticket_id {
            Ok(ticket)
        } else {
            Err(CoreError::Api {
                status: 404,
                message: "Ticket not found".into(),
            })
        }
    }

    async fn get_my_ticket_by_code(&self, code: &str) -> Result<Ticket, CoreError> {
        let ticket = sample_ticket();
        if ticket.code == code {
            Ok(ticket)
        } else {
            Err(CoreError::Api {
                status: 404,
                message: "Ticket not found".into(),
            })
        }
    }
}

#[async_trait]
impl PaymentsApi for MockWallet {
    async fn list_my_payments(&self) -> Result<Vec<Payment>, CoreError> {
        Ok(vec![Payment {
            id: "PM1".into(),
            provider: "payos".into(),
            status: PaymentStatus::Succeeded,
            amount: 1_000_000.0,
            intent_id: "7002".into(),
            user_id: "U1".into(),
            created_at: "2026-08-30T10:00:00Z".parse().expect("timestamp"),
            updated_at: "2026-08-30T10:01:00Z".parse().expect("timestamp"),
        }])
    }

    async fn get_my_payment(&self, payment_id: &str) -> Result<Payment, CoreError> {
        self.list_my_payments()
            .await?
            .into_iter()
            .find(|p| p.id == payment_id)
            .ok_or_else(|| CoreError::Api {
                status: 404,
                message: "Payment not found".into(),
            })
    }
}

fn client() -> (TourbookClient, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let session = Arc::new(Session::new(
        Arc::new(MockAuthApi),
        Arc::new(MemoryTokenStore::new()),
    ));
    let wallet = Arc::new(MockWallet);
    let client = TourbookClient::from_parts(
        session,
        Arc::clone(&backend) as Arc<dyn CartApi>,
        Arc::clone(&backend) as Arc<dyn CheckoutApi>,
        Arc::new(MockCatalog),
        Arc::new(MockPois),
        Arc::new(MockBookings),
        Arc::clone(&wallet) as Arc<dyn TicketsApi>,
        wallet as Arc<dyn PaymentsApi>,
    );
    (client, backend)
}

// ═══════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn add_update_remove_full_cycle() {
    let (client, _) = client();
    client.login("alice@example.com", "pw").await.expect("login");
    assert!(client.cart().snapshot().expect("cart after login").is_empty());

    // Add: one item C1 with qty 2, price assigned by the server.
    client
        .cart()
        .add_tour_item("T1", "O1", 2)
        .await
        .expect("add");
    let snapshot = client.cart().snapshot().expect("snapshot");
    assert_eq!(snapshot.items.len(), 1);
    let item = snapshot.find_item("C1").expect("C1");
    assert_eq!(item.qty, 2);
    assert_eq!(item.unit_price, 500_000.0);
    assert_eq!(item.ref_id, "T1");
    assert_eq!(item.option_id, "O1");

    // Update: qty 3, reflected after resolution.
    client.cart().update_qty("C1", 3).await.expect("update");
    assert_eq!(
        client.cart().snapshot().expect("snapshot").find_item("C1").expect("C1").qty,
        3
    );
    assert_eq!(client.cart().total_qty(), 3);

    // Remove: cart drains.
    client.cart().remove("C1").await.expect("remove");
    assert!(client.cart().snapshot().expect("snapshot").is_empty());
}

#[tokio::test]
async fn login_syncs_cart_and_logout_clears_it() {
    let (client, backend) = client();
    backend
        .add_tour_item("T1", "O1", 2)
        .await
        .expect("seed ledger");

    client.login("alice@example.com", "pw").await.expect("login");
    assert_eq!(client.cart().total_qty(), 2, "cart fetched on login");

    client.logout();
    assert!(client.cart().snapshot().is_none());
    assert!(!client.session().is_authenticated());
    assert_eq!(client.cart().total_qty(), 0);
}

#[tokio::test]
async fn browse_then_add_uses_an_open_departure() {
    let (client, _) = client();
    client.login("alice@example.com", "pw").await.expect("login");

    let destinations = client.tours().list_destinations().await.expect("destinations");
    let tours = client
        .tours()
        .list_tours(Some(&destinations[0].id))
        .await
        .expect("tours");
    let options = client
        .tours()
        .list_tour_options(
            &tours[0].id,
            &TourOptionQuery {
                only_open: true,
                only_future: true,
            },
        )
        .await
        .expect("options");

    assert_eq!(options.len(), 1, "full departures filtered out");
    assert!(options[0].is_bookable());

    client
        .cart()
        .add_tour_item(&tours[0].id, &options[0].id, 1)
        .await
        .expect("add");
    assert_eq!(client.cart().total_qty(), 1);
}

#[tokio::test]
async fn instant_checkout_settles_and_the_cart_drains_on_refresh() {
    let (client, _) = client();
    client.login("alice@example.com", "pw").await.expect("login");
    client.cart().add_tour_item("T1", "O1", 2).await.expect("add");
    client.cart().add_tour_item("T2", "O2", 1).await.expect("add");

    let snapshot = client.cart().snapshot().expect("snapshot");
    let draft =
        CheckoutDraft::new(snapshot.items.iter().map(|i| i.id.clone()).collect())
            .expect("draft");

    let receipt = client.create_checkout_instant(&draft).await.expect("checkout");
    assert!(receipt.ok);
    assert_eq!(receipt.order_code, 7002);

    // The backend removed the purchased items; the facade's silent
    // refresh already made that visible.
    assert!(client.cart().snapshot().expect("snapshot").is_empty());
}

#[tokio::test]
async fn partial_checkout_leaves_unselected_items_in_the_cart() {
    let (client, _) = client();
    client.login("alice@example.com", "pw").await.expect("login");
    client.cart().add_tour_item("T1", "O1", 2).await.expect("add");
    client.cart().add_tour_item("T2", "O2", 1).await.expect("add");

    let draft = CheckoutDraft::new(vec!["C1".into()]).expect("draft");
    let link = client.create_checkout(&draft).await.expect("checkout");
    assert_eq!(link.order_code, 7001);
    assert!(link.checkout_url.is_some());

    let snapshot = client.cart().snapshot().expect("snapshot");
    assert_eq!(snapshot.items.len(), 1);
    assert!(snapshot.find_item("C2").is_some(), "unselected item survives");
}

#[tokio::test]
async fn checkout_without_identity_is_rejected_before_the_cart_is_touched() {
    let (client, _) = client();

    let err = client.cart().add_tour_item("T1", "O1", 1).await.unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));
    assert!(client.cart().snapshot().is_none());
}

#[tokio::test]
async fn bookings_surface_is_reachable() {
    let (client, _) = client();
    client.login("alice@example.com", "pw").await.expect("login");

    let page = client.bookings().list_my_bookings(1, 10).await.expect("page");
    assert_eq!(page.total, 0);

    let err = client.bookings().get_my_booking("B404").await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: 404, .. }));
}

#[tokio::test]
async fn tickets_resolve_by_id_and_by_code() {
    let (client, _) = client();
    client.login("alice@example.com", "pw").await.expect("login");

    let page = client
        .tickets()
        .list_my_tickets(&TicketQuery::default())
        .await
        .expect("page");
    assert_eq!(page.total, 1);
    let listed = &page.rows[0];
    assert!(listed.is_redeemable());
    assert_eq!(listed.booking.snapshot_title.as_deref(), Some("Island Hopping"));

    // Manual code entry at the gate lands on the same ticket.
    let by_code = client
        .tickets()
        .get_my_ticket_by_code(&listed.code)
        .await
        .expect("by code");
    assert_eq!(by_code.id, listed.id);
    assert_eq!(by_code.qr_payload, listed.qr_payload);

    let err = client.tickets().get_my_ticket("TK404").await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: 404, .. }));
}

#[tokio::test]
async fn ticket_status_filter_narrows_the_listing() {
    let (client, _) = client();
    client.login("alice@example.com", "pw").await.expect("login");

    let used_only = TicketQuery {
        status: Some(TicketStatus::Used),
        ..TicketQuery::default()
    };
    let page = client.tickets().list_my_tickets(&used_only).await.expect("page");
    assert!(page.rows.is_empty(), "no used tickets in the wallet");
}

#[tokio::test]
async fn payment_history_is_reachable() {
    let (client, _) = client();
    client.login("alice@example.com", "pw").await.expect("login");

    let payments = client.payments().list_my_payments().await.expect("history");
    assert_eq!(payments.len(), 1);
    assert!(payments[0].is_settled());

    let payment = client.payments().get_my_payment("PM1").await.expect("payment");
    assert_eq!(payment.intent_id, "7002");
}

#[tokio::test]
async fn pois_list_under_their_destination() {
    let (client, _) = client();

    let here = PoiQuery {
        destination_id: Some("D1".into()),
        ..PoiQuery::default()
    };
    let pois = client.pois().list_pois(&here).await.expect("pois");
    assert_eq!(pois.len(), 1);
    assert_eq!(pois[0].name, "Night Market");

    let elsewhere = PoiQuery {
        destination_id: Some("D9".into()),
        ..PoiQuery::default()
    };
    assert!(client.pois().list_pois(&elsewhere).await.expect("pois").is_empty());
}
