//! Application-scoped stack: security groups, instance role and registry.

use tracing::info;
use wimpy_template::{
    values, Expr, Output, Parameter, PolicyDocument, Principal, Properties, Pseudo, Resource,
    Statement, Tags, Template, Value, DEFAULT_FORMAT_VERSION,
};

use crate::error::StackResult;

const DESCRIPTION: &str = "Stack that creates resources needed for a specific application";

const PARAMETERS: [(&str, &str); 8] = [
    ("VPC", "VPC ID"),
    ("Environment", "Environment where this is deployed"),
    ("AppName", "Name of the application"),
    ("AppPort", "Port where the application will be listening"),
    ("AppProtocol", "Protocol used by the application"),
    ("ExposedPort", "Port where the load balancer will be listening"),
    ("MasterKey", "KMS key used"),
    ("StorageBucketName", "S3 Bucket for application data storage"),
];

fn reference(name: &str) -> Expr {
    Expr::reference(name)
}

/// `<Environment>-<AppName>-<suffix>`, the naming scheme of every group.
fn scoped_name(suffix: &str) -> Expr {
    Expr::join(
        "-",
        values![reference("Environment"), reference("AppName"), suffix],
    )
}

/// `/<Environment>/<AppName>/` followed by `tail`.
fn scoped_path(tail: &str) -> Expr {
    Expr::join(
        "",
        values!["/", reference("Environment"), "/", reference("AppName"), tail],
    )
}

fn security_group(name: &str, suffix: &str) -> Resource {
    Resource::new(name, "AWS::EC2::SecurityGroup")
        .with_property("VpcId", reference("VPC"))
        .with_property("GroupDescription", scoped_name(suffix))
        .with_tags(Tags::new().with("Name", scoped_name(suffix)))
}

fn app_ingress(name: &str, source_group: &str) -> Resource {
    Resource::new(name, "AWS::EC2::SecurityGroupIngress")
        .with_property("IpProtocol", reference("AppProtocol"))
        .with_property("FromPort", reference("AppPort"))
        .with_property("ToPort", reference("AppPort"))
        .with_property("SourceSecurityGroupId", reference(source_group))
        .with_property("GroupId", reference("InstanceSecurityGroup"))
}

fn registry_host() -> Expr {
    Expr::join(
        ".",
        values![Pseudo::AccountId, "dkr.ecr", Pseudo::Region, "amazonaws.com"],
    )
}

fn instance_policy() -> PolicyDocument {
    let storage_prefix = |tail: &str| {
        Expr::join(
            "",
            values![
                "arn:aws:s3:::",
                reference("StorageBucketName"),
                "/",
                reference("Environment"),
                "/",
                reference("AppName"),
                tail
            ],
        )
    };

    PolicyDocument::new()
        .statement(
            Statement::allow()
                .sid("allowScopedS3AccessRoot")
                .action(vec!["s3:*"])
                .resource(storage_prefix("/")),
        )
        .statement(
            Statement::allow()
                .sid("allowScopedS3Access")
                .action(vec!["s3:*"])
                .resource(storage_prefix("/*")),
        )
        .statement(
            Statement::allow()
                .sid("allowKMSUse")
                .action(vec![
                    "kms:Encrypt",
                    "kms:Decrypt",
                    "kms:ReEncrypt",
                    "kms:GenerateDataKey*",
                    "kms:DescribeKey",
                ])
                .resource(Expr::join(
                    "/",
                    values![
                        Expr::join(
                            ":",
                            values!["arn:aws:kms", Pseudo::Region, Pseudo::AccountId, "key"]
                        ),
                        reference("MasterKey")
                    ],
                )),
        )
        .statement(
            Statement::allow()
                .sid("allowScopedLogAccess")
                .action(vec![
                    "logs:CreateLogGroup",
                    "logs:CreateLogStream",
                    "logs:PutLogEvents",
                    "logs:DescribeLogStreams",
                ])
                .resource(Expr::join(
                    ":",
                    values![
                        "arn:aws:logs",
                        Pseudo::Region,
                        Pseudo::AccountId,
                        "log-group",
                        scoped_path("/*"),
                        "log-stream",
                        "*"
                    ],
                )),
        )
}

/// Build the template holding everything one application needs inside an environment.
pub fn build_application_template() -> StackResult<Template> {
    let mut t = Template::new();
    t.set_version(DEFAULT_FORMAT_VERSION);
    t.set_description(DESCRIPTION);

    for (name, description) in PARAMETERS {
        t.add_parameter(Parameter::string(name).with_description(description))?;
    }

    t.add_resource(
        security_group("LoadBalancerSecurityGroup", "elb").with_property(
            "SecurityGroupIngress",
            vec![Properties::new()
                .with("ToPort", reference("ExposedPort"))
                .with("FromPort", reference("ExposedPort"))
                .with("IpProtocol", "tcp")
                .with("CidrIp", "0.0.0.0/0")],
        ),
    )?;
    t.add_resource(security_group("InstanceSecurityGroup", "instances"))?;

    t.add_resource(app_ingress("IngressForELB", "LoadBalancerSecurityGroup"))?;
    t.add_resource(app_ingress("IngressForInstances", "InstanceSecurityGroup"))?;
    t.add_resource(
        Resource::new("IngressForSSH", "AWS::EC2::SecurityGroupIngress")
            .with_property("IpProtocol", "tcp")
            .with_property("FromPort", 22)
            .with_property("ToPort", 22)
            .with_property("CidrIp", "0.0.0.0/0")
            .with_property("GroupId", reference("InstanceSecurityGroup")),
    )?;

    t.add_resource(
        security_group("DBSecurityGroup", "db").with_property(
            "SecurityGroupIngress",
            vec![Properties::new()
                .with("SourceSecurityGroupId", reference("InstanceSecurityGroup"))
                .with("FromPort", 0)
                .with("ToPort", 65535)
                .with("IpProtocol", "tcp")],
        ),
    )?;

    t.add_resource(
        Resource::new("IAMInstanceProfile", "AWS::IAM::InstanceProfile")
            .with_property("Path", scoped_path("/"))
            .with_property("Roles", values![reference("IAMRole")]),
    )?;

    t.add_resource(
        Resource::new("IAMRole", "AWS::IAM::Role")
            .with_property("Path", scoped_path("/"))
            .with_property(
                "ManagedPolicyArns",
                vec![
                    "arn:aws:iam::aws:policy/service-role/AmazonEC2RoleforSSM",
                    "arn:aws:iam::aws:policy/AWSXrayFullAccess",
                ],
            )
            .with_property(
                "AssumeRolePolicyDocument",
                PolicyDocument::unversioned().statement(
                    Statement::allow()
                        .action(vec!["sts:AssumeRole"])
                        .principal(Principal::service("ec2.amazonaws.com")),
                ),
            ),
    )?;

    t.add_resource(
        Resource::new("IAMPolicy", "AWS::IAM::Policy")
            .with_property(
                "PolicyName",
                Expr::join("-", values![Pseudo::StackName, "policy"]),
            )
            .with_property("Roles", values![reference("IAMRole")])
            .with_property("PolicyDocument", instance_policy()),
    )?;

    t.add_resource(
        Resource::new("ECRRepository", "AWS::ECR::Repository")
            .with_property("RepositoryName", reference("AppName")),
    )?;

    let outputs: [(&str, Value, &str); 8] = [
        (
            "LoadBalancerSecurityGroup",
            reference("LoadBalancerSecurityGroup").into(),
            "Security group for load balancers",
        ),
        (
            "InstanceSecurityGroup",
            reference("InstanceSecurityGroup").into(),
            "Security group for application instances",
        ),
        (
            "DBSecurityGroup",
            reference("DBSecurityGroup").into(),
            "Security group for databases",
        ),
        (
            "IAMRole",
            reference("IAMRole").into(),
            "Role that allows access to ssm and xray",
        ),
        (
            "IAMInstanceProfile",
            reference("IAMInstanceProfile").into(),
            "Instance profile for application instances",
        ),
        ("Registry", registry_host().into(), "Hostname of the registry"),
        (
            "Repository",
            Expr::join("/", values![registry_host(), reference("ECRRepository")]).into(),
            "Full name of the ECR Repository",
        ),
        (
            "RepositoryName",
            reference("ECRRepository").into(),
            "Name of the ECR Repository",
        ),
    ];
    for (name, value, description) in outputs {
        t.add_output(Output::new(name, value).with_description(description))?;
    }

    info!("Built application template");
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scoped_name() {
        assert_eq!(
            scoped_name("elb").render(),
            json!({"Fn::Join": ["-", [{"Ref": "Environment"}, {"Ref": "AppName"}, "elb"]]})
        );
    }

    #[test]
    fn test_instance_policy_has_four_statements() {
        assert_eq!(instance_policy().statements.len(), 4);
    }

    #[test]
    fn test_kms_resource_is_nested_join() {
        let statement = Value::from(instance_policy().statements[2].clone()).render();
        assert_eq!(
            statement["Resource"],
            json!({"Fn::Join": ["/", [
                {"Fn::Join": [":", ["arn:aws:kms", {"Ref": "AWS::Region"}, {"Ref": "AWS::AccountId"}, "key"]]},
                {"Ref": "MasterKey"}
            ]]})
        );
    }
}
