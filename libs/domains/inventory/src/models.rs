use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{InventoryError, InventoryResult};

/// A stocked item. `quantity` never drops below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub department_id: Option<Uuid>,
}

impl Product {
    /// New product with an empty stock.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        department_id: Option<Uuid>,
    ) -> InventoryResult<Self> {
        let mut product = Self {
            id: Uuid::now_v7(),
            name: String::new(),
            price: 0.0,
            quantity: 0,
            department_id,
        };
        product.rename(name)?;
        product.reprice(price)?;
        Ok(product)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> InventoryResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InventoryError::Validation {
                field: "name",
                message: "must have at least one character.".to_string(),
            });
        }
        self.name = name;
        Ok(())
    }

    pub fn reprice(&mut self, price: f64) -> InventoryResult<()> {
        if !price.is_finite() || price <= 0.0 {
            return Err(InventoryError::Validation {
                field: "price",
                message: "must be greater than 0.".to_string(),
            });
        }
        self.price = price;
        Ok(())
    }

    pub fn assign_department(&mut self, department_id: Option<Uuid>) {
        self.department_id = department_id;
    }

    pub fn increase_quantity_in_stock(&mut self, amount: i32) -> InventoryResult<()> {
        check_amount(amount)?;
        self.quantity = self
            .quantity
            .checked_add(amount)
            .ok_or_else(|| InventoryError::Validation {
                field: "amount",
                message: "exceeds the maximum stock quantity.".to_string(),
            })?;
        Ok(())
    }

    /// Remove `amount` from stock. Leaves the product untouched on failure.
    pub fn sell(&mut self, amount: i32) -> InventoryResult<()> {
        check_amount(amount)?;
        if amount > self.quantity {
            return Err(InventoryError::InsufficientStock {
                available: self.quantity,
                requested: amount,
            });
        }
        self.quantity -= amount;
        Ok(())
    }

    /// Apply the fields present in `changes`.
    pub fn apply_update(&mut self, changes: UpdateProduct) -> InventoryResult<()> {
        if let Some(name) = changes.name {
            self.rename(name)?;
        }
        if let Some(price) = changes.price {
            self.reprice(price)?;
        }
        if let Some(department_id) = changes.department_id {
            self.assign_department(department_id);
        }
        Ok(())
    }
}

pub(crate) fn check_amount(amount: i32) -> InventoryResult<()> {
    if amount < 1 {
        return Err(InventoryError::Validation {
            field: "amount",
            message: "must be positive and integer.".to_string(),
        });
    }
    Ok(())
}

/// A named grouping of products. Its products are looked up by `department_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Responses
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    /// Units in stock
    pub balance: i32,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            balance: product.quantity,
        }
    }
}

/// Stock level after a create, buy or sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockBalance {
    pub id: Uuid,
    pub balance: i32,
}

impl From<&Product> for StockBalance {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            balance: product.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAssignment {
    pub id: Uuid,
    pub product_name: String,
    pub department_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub id: Uuid,
    pub name: String,
}

impl From<Department> for DepartmentDto {
    fn from(department: Department) -> Self {
        Self {
            id: department.id,
            name: department.name,
        }
    }
}

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "must have at least one character."))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0."))]
    pub price: f64,
    #[serde(default)]
    pub department_id: Option<Uuid>,
}

/// Partial update. `departmentId: null` clears the department, an absent
/// `departmentId` keeps it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "must have at least one character."))]
    pub name: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0."))]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub department_id: Option<Option<Uuid>>,
}

impl UpdateProduct {
    /// The department the update points at, if it names one.
    pub fn target_department(&self) -> Option<Uuid> {
        self.department_id.flatten()
    }
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate, ToSchema)]
pub struct StockChange {
    #[validate(range(min = 1, message = "must be positive and integer."))]
    pub amount: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignDepartment {
    pub department_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct DepartmentName {
    #[validate(
        length(min = 1, max = 100, message = "must have between 1 and 100 characters."),
        custom(function = "not_blank", message = "must not be blank.")
    )]
    pub name: String,
}

/// Whitespace-only names are rejected like they are for products. The empty
/// string is left to the length rule.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stocked(quantity: i32) -> Product {
        let mut product = Product::new("Widget", 10.0, None).unwrap();
        if quantity > 0 {
            product.increase_quantity_in_stock(quantity).unwrap();
        }
        product
    }

    #[test]
    fn test_new_product_has_empty_stock() {
        let product = Product::new("Widget", 10.0, None).unwrap();
        assert_eq!(product.quantity, 0);
        assert_eq!(ProductDto::from(product).balance, 0);
    }

    #[test]
    fn test_new_product_rejects_bad_price_and_name() {
        assert!(matches!(
            Product::new("Widget", 0.0, None),
            Err(InventoryError::Validation { field: "price", .. })
        ));
        assert!(matches!(
            Product::new("Widget", f64::NAN, None),
            Err(InventoryError::Validation { field: "price", .. })
        ));
        assert!(matches!(
            Product::new("  ", 1.0, None),
            Err(InventoryError::Validation { field: "name", .. })
        ));
    }

    #[test]
    fn test_oversell_leaves_quantity_unchanged() {
        let mut product = stocked(3);
        let err = product.sell(4).unwrap_err();

        assert!(matches!(
            err,
            InventoryError::InsufficientStock {
                available: 3,
                requested: 4
            }
        ));
        assert_eq!(product.quantity, 3);
    }

    #[test]
    fn test_buy_then_sell_restores_quantity() {
        for (start, amount) in [(0, 1), (5, 5), (10, 7), (1, 1000)] {
            let mut product = stocked(start);
            product.increase_quantity_in_stock(amount).unwrap();
            product.sell(amount).unwrap();
            assert_eq!(product.quantity, start);
        }
    }

    #[test]
    fn test_non_positive_amounts_are_rejected() {
        let mut product = stocked(5);
        assert!(product.increase_quantity_in_stock(0).is_err());
        assert!(product.sell(-1).is_err());
        assert_eq!(product.quantity, 5);
    }

    #[test]
    fn test_stock_overflow_is_rejected() {
        let mut product = stocked(i32::MAX);
        assert!(product.increase_quantity_in_stock(1).is_err());
        assert_eq!(product.quantity, i32::MAX);
    }

    #[test]
    fn test_update_department_tristate() {
        let department = Uuid::now_v7();

        let absent: UpdateProduct = serde_json::from_str(r#"{"name":"Gadget"}"#).unwrap();
        assert_eq!(absent.department_id, None);

        let cleared: UpdateProduct = serde_json::from_str(r#"{"departmentId":null}"#).unwrap();
        assert_eq!(cleared.department_id, Some(None));

        let set: UpdateProduct =
            serde_json::from_value(serde_json::json!({ "departmentId": department })).unwrap();
        assert_eq!(set.target_department(), Some(department));

        let mut product = Product::new("Widget", 10.0, Some(department)).unwrap();
        product.apply_update(absent).unwrap();
        assert_eq!(product.name, "Gadget");
        assert_eq!(product.department_id, Some(department));

        product.apply_update(cleared).unwrap();
        assert_eq!(product.department_id, None);
    }

    #[test]
    fn test_failed_update_is_reported() {
        let mut product = Product::new("Widget", 10.0, None).unwrap();
        let changes = UpdateProduct {
            price: Some(-1.0),
            ..Default::default()
        };
        assert!(product.apply_update(changes).is_err());
        assert_eq!(product.price, 10.0);
    }

    #[test]
    fn test_request_validation() {
        let create = CreateProduct {
            name: String::new(),
            price: 0.0,
            department_id: None,
        };
        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("price"));

        assert!(StockChange { amount: 0 }.validate().is_err());
        assert!(StockChange { amount: 1 }.validate().is_ok());

        let long = DepartmentName {
            name: "x".repeat(101),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_department_name_must_not_be_blank() {
        let blank = DepartmentName {
            name: "   ".to_string(),
        };
        let errors = blank.validate().unwrap_err();
        assert_eq!(errors.field_errors()["name"].len(), 1);

        let empty = DepartmentName { name: String::new() };
        assert_eq!(empty.validate().unwrap_err().field_errors()["name"].len(), 1);

        let padded = DepartmentName {
            name: " Garden ".to_string(),
        };
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn test_dto_field_names_are_camel_case() {
        let json = serde_json::to_value(DepartmentAssignment {
            id: Uuid::nil(),
            product_name: "Widget".to_string(),
            department_id: Uuid::nil(),
        })
        .unwrap();

        assert!(json.get("productName").is_some());
        assert!(json.get("departmentId").is_some());
    }
}
