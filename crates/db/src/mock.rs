use async_trait::async_trait;
use mockall::mock;
use parkspot_core::{
    errors::ParkResult,
    models::{
        slot::{Booking, ParkingSlot, SlotFilter, SlotPatch, SlotState},
        user::{Session, User},
    },
    store::{IdentityStore, SlotStore},
};
use uuid::Uuid;

// Mock stores for testing
mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn create(&self, slot_number: i32, state: SlotState) -> ParkResult<ParkingSlot>;
        async fn get(&self, id: Uuid) -> ParkResult<ParkingSlot>;
        async fn get_by_slot_number(&self, slot_number: i32) -> ParkResult<ParkingSlot>;
        async fn list(&self, filter: SlotFilter) -> ParkResult<Vec<ParkingSlot>>;
        async fn update(&self, id: Uuid, patch: SlotPatch) -> ParkResult<ParkingSlot>;
        async fn update_if(&self, id: Uuid, expected: ParkingSlot, patch: SlotPatch) -> ParkResult<Option<ParkingSlot>>;
        async fn delete(&self, id: Uuid) -> ParkResult<()>;
        async fn book_if_available(&self, id: Uuid, booking: Booking) -> ParkResult<Option<ParkingSlot>>;
        async fn delete_if_available(&self, id: Uuid) -> ParkResult<bool>;
    }
}

mock! {
    pub IdentityStore {}

    #[async_trait]
    impl IdentityStore for IdentityStore {
        async fn create_user(&self, username: &str, password_hash: &str) -> ParkResult<User>;
        async fn find_user(&self, id: Uuid) -> ParkResult<Option<User>>;
        async fn find_user_by_username(&self, username: &str) -> ParkResult<Option<User>>;
        async fn create_session(&self, session: Session) -> ParkResult<Session>;
        async fn find_session(&self, token: &str) -> ParkResult<Option<Session>>;
        async fn delete_session(&self, token: &str) -> ParkResult<()>;
    }
}
