use crate::domain::notification::SignedFields;
use md5::{Digest, Md5};
use rust_decimal::Decimal;
use subtle::ConstantTimeEq;

#[derive(Clone)]
pub struct PayHereSigner {
    merchant_id: String,
    merchant_secret: String,
}

impl PayHereSigner {
    pub fn new(merchant_id: impl Into<String>, merchant_secret: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_secret: merchant_secret.into(),
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn secret_digest(&self) -> String {
        md5_upper(&self.merchant_secret)
    }

    // Amount is always rendered with two decimals.
    pub fn checkout_hash(&self, order_id: &str, amount: Decimal, currency: &str) -> String {
        md5_upper(&format!(
            "{}{}{:.2}{}{}",
            self.merchant_id,
            order_id,
            amount,
            currency,
            self.secret_digest()
        ))
    }

    pub fn notification_signature(
        &self,
        merchant_id: &str,
        order_id: &str,
        amount: &str,
        currency: &str,
        status_code: &str,
    ) -> String {
        md5_upper(&format!(
            "{}{}{}{}{}{}",
            merchant_id,
            order_id,
            amount,
            currency,
            status_code,
            self.secret_digest()
        ))
    }

    pub fn verify(&self, fields: &SignedFields<'_>) -> bool {
        let expected = self.notification_signature(
            fields.merchant_id,
            fields.order_id,
            fields.amount,
            fields.currency,
            fields.status_code,
        );
        expected.as_bytes().ct_eq(fields.signature.as_bytes()).into()
    }
}

fn md5_upper(input: &str) -> String {
    hex::encode_upper(Md5::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(sig: &str) -> SignedFields<'_> {
        SignedFields {
            merchant_id: "1211149",
            order_id: "ORD-77",
            amount: "1000.00",
            currency: "LKR",
            status_code: "2",
            signature: sig,
        }
    }

    #[test]
    fn secret_digest_is_uppercase_md5() {
        let signer = PayHereSigner::new("1211149", "abc");
        assert_eq!(signer.secret_digest(), "900150983CD24FB0D6963F7D28E17F72");
    }

    #[test]
    fn empty_secret_digest_matches_md5_of_empty_string() {
        let signer = PayHereSigner::new("1211149", "");
        assert_eq!(signer.secret_digest(), "D41D8CD98F00B204E9800998ECF8427E");
    }

    #[test]
    fn verifies_own_signature_and_rejects_lowercase() {
        let signer = PayHereSigner::new("1211149", "s3cret");
        let sig = signer.notification_signature("1211149", "ORD-77", "1000.00", "LKR", "2");
        assert_eq!(sig.len(), 32);
        assert!(signer.verify(&fields(&sig)));

        let lower = sig.to_lowercase();
        assert!(!signer.verify(&fields(&lower)));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let merchant = PayHereSigner::new("1211149", "s3cret");
        let attacker = PayHereSigner::new("1211149", "guess");
        let forged = attacker.notification_signature("1211149", "ORD-77", "1000.00", "LKR", "2");
        assert!(!merchant.verify(&fields(&forged)));
    }

    #[test]
    fn checkout_hash_renders_two_decimals() {
        let signer = PayHereSigner::new("1211149", "s3cret");
        let a = signer.checkout_hash("ORD-1", Decimal::from(1000), "LKR");
        let b = signer.checkout_hash("ORD-1", Decimal::new(100000, 2), "LKR");
        assert_eq!(a, b);
        assert_eq!(
            a,
            md5_upper(&format!("1211149ORD-11000.00LKR{}", signer.secret_digest()))
        );
    }
}
