//! Currencies, pay periods, holidays and overtime rules.

use std::sync::Arc;

use hrsync_core::sync::{
    CompanyCurrencyConfigPayload, CurrencyPayload, HolidayPayload, OvertimePayload,
    OvertimePaymentTierPayload, PayPeriodPayload,
};

use super::MirrorHandler;
use crate::registry::{RegistryBuilder, RegistryError};
use crate::store::MirrorStore;

pub(super) fn register(
    builder: RegistryBuilder,
    store: &Arc<dyn MirrorStore>,
) -> Result<RegistryBuilder, RegistryError> {
    builder
        .register(MirrorHandler::<CurrencyPayload>::new(store.clone()))?
        .register(MirrorHandler::<CompanyCurrencyConfigPayload>::new(store.clone()))?
        .register(MirrorHandler::<PayPeriodPayload>::new(store.clone()))?
        .register(MirrorHandler::<HolidayPayload>::new(store.clone()))?
        .register(MirrorHandler::<OvertimePayload>::new(store.clone()))?
        .register(MirrorHandler::<OvertimePaymentTierPayload>::new(store.clone()))
}
